//! Intent Model
//!
//! This module defines the structured voice command delivered by the upstream
//! spoken-language-understanding bus, plus the closed set of command names
//! this dispatcher understands.

use serde::{Deserialize, Serialize};

/// A single named slot value as delivered by the bus.
///
/// A slot name may appear more than once in an intent; only the first
/// occurrence per name is ever used (see [`crate::slots::Slots::extract`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotValue {
    pub name: String,
    pub value: String,
}

/// A structured voice command: one per invocation, immutable, discarded after
/// the session is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// The raw wire name, possibly carrying a skill prefix (e.g. `s710:turnOnLight`).
    pub name: String,
    /// Identifier of the dialogue session this intent belongs to.
    pub session_id: String,
    /// The physical location that heard the command; lowest-precedence target.
    pub site_id: String,
    /// Raw slot values in upstream delivery order.
    pub slots: Vec<SlotValue>,
}

impl Intent {
    /// Creates an intent with the given name, site and slots.
    pub fn new(
        name: impl Into<String>,
        session_id: impl Into<String>,
        site_id: impl Into<String>,
        slots: Vec<SlotValue>,
    ) -> Self {
        Self {
            name: name.into(),
            session_id: session_id.into(),
            site_id: site_id.into(),
            slots,
        }
    }

    /// Parses the wire name into a recognized [`IntentKind`], if any.
    pub fn kind(&self) -> Option<IntentKind> {
        IntentKind::parse(&self.name)
    }
}

/// The closed set of voice commands the dispatcher can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    TurnOnLight,
    TurnOffLight,
    TurnOnAllLights,
    TurnOffAllLights,
    KeepLightOn,
    KeepLightOff,
    EnableAutomatic,
    EnableAutomaticOff,
    SetLightBrightness,
}

impl IntentKind {
    /// Parses a wire intent name, ignoring an optional `<skill>:` prefix.
    ///
    /// Returns `None` for unrecognized names; the caller treats that as a
    /// normal no-op, not a fault.
    pub fn parse(name: &str) -> Option<Self> {
        let bare = name.rsplit(':').next().unwrap_or(name);
        match bare {
            "turnOnLight" => Some(Self::TurnOnLight),
            "turnOffLight" => Some(Self::TurnOffLight),
            "turnOnAllLights" => Some(Self::TurnOnAllLights),
            "turnOffAllLights" => Some(Self::TurnOffAllLights),
            "keepLightOn" => Some(Self::KeepLightOn),
            "keepLightOff" => Some(Self::KeepLightOff),
            "enableAutomatic" => Some(Self::EnableAutomatic),
            "enableAutomaticOff" => Some(Self::EnableAutomaticOff),
            "setLightBrightness" => Some(Self::SetLightBrightness),
            _ => None,
        }
    }
}
