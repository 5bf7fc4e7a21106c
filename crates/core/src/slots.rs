//! Slot Extraction
//!
//! Pulls the typed slot values (device id, room id, brightness) out of a raw
//! intent. Extraction is best-effort: an unparsable value leaves its field
//! unset and never fails the whole intent.

use crate::intent::Intent;

/// Wire name of the slot carrying the target device.
const SLOT_DEVICE: &str = "lightType";
/// Wire name of the slot carrying the target room.
const SLOT_ROOM: &str = "roomName";
/// Wire name of the slot carrying the brightness level.
const SLOT_BRIGHTNESS: &str = "brightness";

/// The typed slot values of one intent, derived once at extraction time.
///
/// Every field is independently optional; which combinations are required is
/// decided later by the resolver, per intent kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots {
    /// Normalized device identifier (e.g. `stehlampe`).
    pub device_id: Option<String>,
    /// Normalized room identifier (e.g. `buero`).
    pub room_id: Option<String>,
    /// Brightness level, 0..=255.
    pub brightness: Option<u8>,
}

impl Slots {
    /// Extracts the typed slots from a raw intent.
    ///
    /// For each slot name only the first delivered value is used. Device and
    /// room identifiers are normalized; a brightness value that does not
    /// parse is dropped while the other fields are kept.
    pub fn extract(intent: &Intent) -> Self {
        let first = |name: &str| {
            intent
                .slots
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.value.as_str())
        };

        Self {
            device_id: first(SLOT_DEVICE).map(normalize_entity),
            room_id: first(SLOT_ROOM).map(normalize_entity),
            brightness: first(SLOT_BRIGHTNESS).and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// Normalizes a spoken entity name into the form used in automation entity ids.
///
/// Lower-cases the value, then folds exactly the three umlauts ä→ae, ü→ue,
/// ö→oe. No broader diacritic folding is applied.
fn normalize_entity(value: &str) -> String {
    value
        .to_lowercase()
        .replace('ä', "ae")
        .replace('ü', "ue")
        .replace('ö', "oe")
}
