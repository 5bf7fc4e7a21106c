//! Intent Bus
//!
//! The seam to the upstream spoken-language-understanding bus. The core only
//! ever needs two operations from it: receive the next intent and close a
//! session with an utterance. [`HermesMqtt`] is the shipped adapter for the
//! Hermes dialogue interface over MQTT; it decodes intent messages and
//! publishes session-end requests, nothing more.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lampe_core::intent::{Intent, SlotValue};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Topic filter under which every recognized intent is published.
const INTENT_TOPIC_FILTER: &str = "hermes/intent/#";
/// Topic for closing a dialogue session with a final utterance.
const END_SESSION_TOPIC: &str = "hermes/dialogueManager/endSession";

/// The two operations the dispatcher consumes from the intent bus.
#[async_trait(?Send)]
pub trait IntentBus: Send {
    /// Waits for the next intent; `Ok(None)` means the bus has shut down.
    async fn recv(&mut self) -> Result<Option<Intent>>;

    /// Closes the given session, speaking `text` (possibly empty).
    async fn end_session(&self, session_id: &str, text: &str) -> Result<()>;
}

/// An [`IntentBus`] over the Hermes MQTT dialogue interface.
pub struct HermesMqtt {
    client: AsyncClient,
    eventloop: EventLoop,
}

impl HermesMqtt {
    /// Connects to the MQTT broker named in the configuration and subscribes
    /// to the intent topic.
    pub async fn connect(config: &Config) -> Result<Self> {
        let (host, port) = match config.mqtt_host.rsplit_once(':') {
            Some((host, port)) => (
                host.to_string(),
                port.parse::<u16>()
                    .with_context(|| format!("Invalid MQTT port in '{}'", config.mqtt_host))?,
            ),
            None => (config.mqtt_host.clone(), 1883),
        };

        let mut options = MqttOptions::new("lampe-dispatcher", host, port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(user), Some(pass)) = (&config.mqtt_username, &config.mqtt_password) {
            options.set_credentials(user.as_str(), pass.as_str());
        }

        let (client, eventloop) = AsyncClient::new(options, 16);
        client
            .subscribe(INTENT_TOPIC_FILTER, QoS::AtMostOnce)
            .await
            .context("Failed to subscribe to the intent topic")?;

        Ok(Self { client, eventloop })
    }
}

#[async_trait(?Send)]
impl IntentBus for HermesMqtt {
    async fn recv(&mut self) -> Result<Option<Intent>> {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match parse_intent(&publish.payload) {
                        Ok(intent) => return Ok(Some(intent)),
                        Err(e) => {
                            // A malformed message never takes the service down.
                            warn!(topic = %publish.topic, error = ?e, "Skipping undecodable intent message");
                        }
                    }
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to the intent bus");
                }
                Ok(Event::Incoming(Packet::Disconnect)) => return Ok(None),
                Ok(_) => {}
                Err(e) => return Err(e).context("Intent bus connection failed"),
            }
        }
    }

    async fn end_session(&self, session_id: &str, text: &str) -> Result<()> {
        let payload = serde_json::to_vec(&EndSession {
            session_id,
            text,
        })?;
        self.client
            .publish(END_SESSION_TOPIC, QoS::AtLeastOnce, false, payload)
            .await
            .context("Failed to publish endSession")?;
        Ok(())
    }
}

/// Decodes a Hermes intent message into the core [`Intent`].
///
/// Multi-valued slots arrive as repeated entries and are kept in delivery
/// order; value selection (first wins) happens later in the extractor.
fn parse_intent(payload: &[u8]) -> Result<Intent> {
    let message: HermesIntentMessage =
        serde_json::from_slice(payload).context("Malformed intent JSON")?;

    let slots = message
        .slots
        .into_iter()
        .filter_map(|slot| {
            let value = slot.text_value()?;
            Some(SlotValue {
                name: slot.slot_name,
                value,
            })
        })
        .collect();

    Ok(Intent::new(
        message.intent.intent_name,
        message.session_id,
        message.site_id,
        slots,
    ))
}

// --- Hermes wire format ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HermesIntentMessage {
    session_id: String,
    site_id: String,
    intent: HermesIntent,
    #[serde(default)]
    slots: Vec<HermesSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HermesIntent {
    intent_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HermesSlot {
    slot_name: String,
    raw_value: Option<String>,
    value: Option<HermesSlotValue>,
}

#[derive(Debug, Deserialize)]
struct HermesSlotValue {
    value: serde_json::Value,
}

impl HermesSlot {
    /// The resolved slot value as text, preferring the typed value over the
    /// raw transcription.
    fn text_value(&self) -> Option<String> {
        match self.value.as_ref().map(|v| &v.value) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => self.raw_value.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndSession<'a> {
    session_id: &'a str,
    text: &'a str,
}
