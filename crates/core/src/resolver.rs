//! Command Resolution
//!
//! The decision core of the dispatcher: maps an intent kind plus its
//! extracted slots to an ordered [`Plan`] of automation-service calls.
//! Resolution is a pure function; identical inputs always produce an
//! identical plan.

use crate::intent::IntentKind;
use crate::slots::Slots;
use serde::Serialize;

/// The fixed set of automation-service endpoints this dispatcher calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    LightsOn,
    LightsOff,
    GroupOn,
    GroupOff,
    AutomationOn,
    AutomationOff,
}

impl Endpoint {
    /// The service path, appended to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::LightsOn => "/api/services/light/turn_on",
            Self::LightsOff => "/api/services/light/turn_off",
            Self::GroupOn => "/api/services/homeassistant/turn_on",
            Self::GroupOff => "/api/services/homeassistant/turn_off",
            Self::AutomationOn => "/api/services/automation/turn_on",
            Self::AutomationOff => "/api/services/automation/turn_off",
        }
    }
}

/// JSON body of one automation-service call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionPayload {
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}

impl ActionPayload {
    fn entity(entity_id: String) -> Self {
        Self {
            entity_id,
            brightness: None,
        }
    }
}

/// One endpoint-plus-payload call against the automation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub endpoint: Endpoint,
    pub payload: ActionPayload,
}

impl ActionRequest {
    fn new(endpoint: Endpoint, payload: ActionPayload) -> Self {
        Self { endpoint, payload }
    }
}

/// An ordered sequence of one or two [`ActionRequest`]s.
///
/// The two-leg form always carries the side-effect call (automation rule
/// enable/disable) first and the primary call second; execution order is
/// significant and never reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub first: ActionRequest,
    pub second: Option<ActionRequest>,
}

impl Plan {
    fn single(request: ActionRequest) -> Self {
        Self {
            first: request,
            second: None,
        }
    }

    /// Builds a composite plan: `side_effect` runs first, `primary` second.
    fn then(side_effect: ActionRequest, primary: ActionRequest) -> Self {
        Self {
            first: side_effect,
            second: Some(primary),
        }
    }

    /// The requests in execution order.
    pub fn requests(&self) -> impl Iterator<Item = &ActionRequest> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }
}

/// Resolves an intent kind into a [`Plan`], or `None` when the required slot
/// combination is missing.
///
/// `None` is a normal outcome (the caller logs and ignores the intent), not
/// an error. Target precedence is identical for every light-targeting kind:
/// device id, else room id, else site id.
pub fn resolve(kind: IntentKind, slots: &Slots, site_id: &str) -> Option<Plan> {
    use IntentKind::*;

    match kind {
        TurnOnLight => Some(Plan::single(light_request(true, slots, site_id))),
        TurnOffLight => Some(Plan::single(light_request(false, slots, site_id))),

        TurnOnAllLights => Some(Plan::single(all_lights_request(Endpoint::GroupOn))),
        TurnOffAllLights => Some(Plan::single(all_lights_request(Endpoint::GroupOff))),

        // Keep the light on: disable the auto-off rule, then force the light
        // on exactly as a plain turnOnLight would.
        KeepLightOn => {
            let side = automation_request(Endpoint::AutomationOff, "off", slots, site_id);
            let primary = resolve(TurnOnLight, slots, site_id)?.first;
            Some(Plan::then(side, primary))
        }

        // Keep the light off: disable the auto-on rule, then force it off.
        KeepLightOff => {
            let side = automation_request(Endpoint::AutomationOff, "on", slots, site_id);
            let primary = resolve(TurnOffLight, slots, site_id)?.first;
            Some(Plan::then(side, primary))
        }

        // Re-enable both rules: auto-on first, then the auto-off leg, which
        // is exactly what enableAutomaticOff resolves to on its own.
        EnableAutomatic => {
            let side = automation_request(Endpoint::AutomationOn, "on", slots, site_id);
            let primary = resolve(EnableAutomaticOff, slots, site_id)?.first;
            Some(Plan::then(side, primary))
        }

        EnableAutomaticOff => Some(Plan::single(automation_request(
            Endpoint::AutomationOn,
            "off",
            slots,
            site_id,
        ))),

        // Requires both a concrete device and a level; anything else is a miss.
        SetLightBrightness => match (&slots.device_id, slots.brightness) {
            (Some(device), Some(level)) => Some(Plan::single(ActionRequest::new(
                Endpoint::LightsOn,
                ActionPayload {
                    entity_id: format!("light.{device}"),
                    brightness: Some(level),
                },
            ))),
            _ => None,
        },
    }
}

/// A direct light call when a device id is present, otherwise a group call
/// against the room (or, failing that, the site) light group.
fn light_request(on: bool, slots: &Slots, site_id: &str) -> ActionRequest {
    if let Some(device) = &slots.device_id {
        let endpoint = if on {
            Endpoint::LightsOn
        } else {
            Endpoint::LightsOff
        };
        ActionRequest::new(endpoint, ActionPayload::entity(format!("light.{device}")))
    } else {
        let target = slots.room_id.as_deref().unwrap_or(site_id);
        let endpoint = if on {
            Endpoint::GroupOn
        } else {
            Endpoint::GroupOff
        };
        ActionRequest::new(
            endpoint,
            ActionPayload::entity(format!("group.lights_{target}")),
        )
    }
}

/// The all-lights group call; ignores device, room and site slots entirely.
fn all_lights_request(endpoint: Endpoint) -> ActionRequest {
    ActionRequest::new(endpoint, ActionPayload::entity("group.all_lights".into()))
}

/// A call against the `automation.lights_<rule>_<target>` rule entity,
/// following the same device/room/site precedence as light targets.
fn automation_request(
    endpoint: Endpoint,
    rule: &str,
    slots: &Slots,
    site_id: &str,
) -> ActionRequest {
    let target = slots
        .device_id
        .as_deref()
        .or(slots.room_id.as_deref())
        .unwrap_or(site_id);
    ActionRequest::new(
        endpoint,
        ActionPayload::entity(format!("automation.lights_{rule}_{target}")),
    )
}
