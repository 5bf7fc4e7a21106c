//! Service wiring for the lampe voice-intent dispatcher: configuration
//! loading and the intent-bus adapter. The decision logic itself lives in
//! `lampe-core`.

pub mod bus;
pub mod config;
