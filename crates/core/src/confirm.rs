//! Confirmation Emission
//!
//! Maps the outcome of an executed plan to the spoken utterance that closes
//! the dialogue session.

use crate::executor::Outcome;

/// Confirmation settings, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Confirmations {
    /// When false, every session closes silently.
    pub enabled: bool,
    /// Spoken when the plan executed successfully.
    pub success_phrase: String,
    /// Spoken when any call of the plan failed.
    pub failure_phrase: String,
}

/// Picks the session-closing utterance for an outcome.
///
/// Disabled confirmations yield the empty utterance; otherwise the success
/// or failure phrase. There is no partial-success variant: a composite plan
/// collapses to a single success or failure signal.
pub fn confirmation(outcome: &Outcome, confirmations: &Confirmations) -> String {
    if !confirmations.enabled {
        String::new()
    } else if outcome.success {
        confirmations.success_phrase.clone()
    } else {
        confirmations.failure_phrase.clone()
    }
}
