//! Plan Execution
//!
//! Issues a [`Plan`]'s requests against the automation service in order,
//! short-circuiting on the first failure. The transport itself lives behind
//! the [`AutomationClient`] trait so that execution logic can be tested with
//! a mock.

use crate::resolver::{ActionPayload, Endpoint, Plan};
use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

/// HTTP status treated as success; everything else fails the plan.
const STATUS_OK: u16 = 200;

/// The transport seam to the automation service.
///
/// Implementations send one request and report the HTTP status; a returned
/// `Err` means the request never produced a response (timeout, refused
/// connection). No retries happen at this layer or above.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AutomationClient: Send + Sync {
    /// Sends `payload` to `endpoint` and returns the response status code.
    async fn call(&self, endpoint: Endpoint, payload: &ActionPayload) -> Result<u16>;
}

/// The result of executing a [`Plan`].
///
/// `last_status` is the status of the last *attempted* call; it is `None`
/// when that call failed at the transport level before any response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub last_status: Option<u16>,
}

impl Outcome {
    fn ok(status: u16) -> Self {
        Self {
            success: true,
            last_status: Some(status),
        }
    }

    fn failed(status: Option<u16>) -> Self {
        Self {
            success: false,
            last_status: status,
        }
    }
}

/// Executes the plan's requests in order, stopping at the first failure.
///
/// If the first call of a two-leg plan does not return 200, the second call
/// is never issued. A fully executed plan yields a success outcome carrying
/// the final call's status.
pub async fn execute(plan: &Plan, client: &dyn AutomationClient) -> Outcome {
    let mut last_status = STATUS_OK;

    for request in plan.requests() {
        match client.call(request.endpoint, &request.payload).await {
            Ok(status) if status == STATUS_OK => last_status = status,
            Ok(status) => {
                warn!(
                    endpoint = request.endpoint.path(),
                    entity = %request.payload.entity_id,
                    status,
                    "Automation service call failed"
                );
                return Outcome::failed(Some(status));
            }
            Err(e) => {
                warn!(
                    endpoint = request.endpoint.path(),
                    entity = %request.payload.entity_id,
                    error = ?e,
                    "Automation service unreachable"
                );
                return Outcome::failed(None);
            }
        }
    }

    Outcome::ok(last_status)
}
