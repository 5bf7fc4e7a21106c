//! Intent Dispatching
//!
//! The per-intent orchestrator: extract slots, resolve a plan, execute it
//! and produce the session-closing utterance. One intent is processed
//! end-to-end per call; no state survives between intents.

use crate::confirm::{Confirmations, confirmation};
use crate::executor::{AutomationClient, execute};
use crate::intent::Intent;
use crate::resolver::resolve;
use crate::slots::Slots;
use std::sync::Arc;
use tracing::{info, instrument};

/// Wires the extraction, resolution, execution and confirmation stages
/// together for each received intent.
pub struct Dispatcher {
    client: Arc<dyn AutomationClient>,
    confirmations: Confirmations,
}

impl Dispatcher {
    /// Creates a dispatcher using the given transport and confirmation
    /// settings.
    pub fn new(client: Arc<dyn AutomationClient>, confirmations: Confirmations) -> Self {
        Self {
            client,
            confirmations,
        }
    }

    /// Processes one intent and returns the utterance to close its session
    /// with.
    ///
    /// An unrecognized intent, or one missing its required slots, is logged
    /// and closed with the empty utterance without touching the automation
    /// service. Every other path ends in a confirmation (possibly empty when
    /// confirmations are disabled); nothing escalates beyond a spoken
    /// failure.
    #[instrument(skip_all, fields(intent = %intent.name, site = %intent.site_id))]
    pub async fn handle(&self, intent: &Intent) -> String {
        let slots = Slots::extract(intent);

        let plan = intent
            .kind()
            .and_then(|kind| resolve(kind, &slots, &intent.site_id));

        let Some(plan) = plan else {
            info!("Intent or parameters not recognized, ignoring");
            return String::new();
        };

        info!(
            calls = plan.requests().count(),
            endpoint = plan.first.endpoint.path(),
            entity = %plan.first.payload.entity_id,
            "Dispatching plan"
        );

        let outcome = execute(&plan, self.client.as_ref()).await;
        confirmation(&outcome, &self.confirmations)
    }
}
