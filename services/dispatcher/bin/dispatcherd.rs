//! Main Entrypoint for the lampe Dispatcher Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Constructing the automation-service client and the dispatcher.
//! 4. Connecting to the intent bus and processing intents serially until
//!    shutdown.

use anyhow::Context;
use lampe_core::{client::RestClient, dispatcher::Dispatcher};
use lampe_dispatcher::{
    bus::{HermesMqtt, IntentBus},
    config::Config,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing dispatcher...");

    // --- 3. Build the Dispatcher ---
    let client = Arc::new(RestClient::new(&config.hass_url, &config.hass_token));
    let dispatcher = Dispatcher::new(client, config.confirmations.clone());

    // --- 4. Connect to the Intent Bus ---
    let mut bus = HermesMqtt::connect(&config)
        .await
        .context("Failed to connect to the intent bus")?;
    info!(
        mqtt_host = %config.mqtt_host,
        hass_url = %config.hass_url,
        "Service configured. Waiting for intents..."
    );

    // --- 5. Process Intents Serially ---
    // One intent runs end-to-end before the next is accepted; the pipeline
    // holds no state across intents.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal. Shutting down gracefully...");
                break;
            }
            next = bus.recv() => match next {
                Ok(Some(intent)) => {
                    let utterance = dispatcher.handle(&intent).await;
                    if let Err(e) = bus.end_session(&intent.session_id, &utterance).await {
                        error!(error = ?e, session_id = %intent.session_id, "Failed to close session");
                    }
                }
                Ok(None) => {
                    info!("Intent bus closed the connection.");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
    }

    info!("Dispatcher has shut down.");
    Ok(())
}
