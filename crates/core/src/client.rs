//! Automation Service REST Client
//!
//! The production [`AutomationClient`] implementation: posts each action to
//! the automation service's REST API with a bearer token.

use crate::executor::AutomationClient;
use crate::resolver::{ActionPayload, Endpoint};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// A reqwest-backed client for the automation service REST API.
///
/// Connection pooling, TLS and timeouts are whatever the underlying
/// `reqwest::Client` provides; this layer adds no retries of its own.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    /// Creates a client for the service at `base_url` (without a trailing
    /// slash) authenticating with the given long-lived access token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }
}

#[async_trait]
impl AutomationClient for RestClient {
    async fn call(&self, endpoint: Endpoint, payload: &ActionPayload) -> Result<u16> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!(%url, entity = %payload.entity_id, "Calling automation service");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped_from_the_base_url() {
        let client = RestClient::new("http://hassio/homeassistant/api/", "token");
        assert_eq!(client.base_url, "http://hassio/homeassistant/api");
    }
}
