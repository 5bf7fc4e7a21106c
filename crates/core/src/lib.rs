//! Intent-resolution and command-composition engine for the lampe voice
//! dispatcher.
//!
//! The pipeline per received intent: [`slots::Slots::extract`] →
//! [`resolver::resolve`] → [`executor::execute`] → [`confirm::confirmation`],
//! orchestrated by [`dispatcher::Dispatcher`]. The automation-service
//! transport sits behind the [`executor::AutomationClient`] trait;
//! [`client::RestClient`] is the production implementation.

pub mod client;
pub mod confirm;
pub mod dispatcher;
pub mod executor;
pub mod intent;
pub mod resolver;
pub mod slots;
