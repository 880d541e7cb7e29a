//! Configuration message sent by the companion app.
//!
//! The app writes a TLV byte string to the config characteristic:
//! ```text
//! [key][len][value: len bytes] [key][len][value] ...
//!
//! key 1: vibrate on bluetooth lost - 1..=4 byte little-endian signed int
//! key 2: vibrate interval minutes  - UTF-8 numeric string
//! key 3: battery warning percent   - UTF-8 numeric string
//! ```
//! Unknown keys are skipped. A truncated record stops decoding; fields
//! seen before it are kept.

use heapless::String;

use crate::settings::{ConfigField, IncomingValue, Settings};

pub const KEY_VIBRATE_ON_BT_LOST: u8 = 1;
pub const KEY_VIBRATE_INTERVAL: u8 = 2;
pub const KEY_BATTERY_WARNING: u8 = 3;

/// Longest numeric string accepted for a text field.
pub const FIELD_TEXT_LEN: usize = 8;

pub type FieldText = String<FIELD_TEXT_LEN>;

/// Decoded configuration message. Absent fields are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigMessage {
    pub vibrate_on_bluetooth_lost: Option<i32>,
    pub vibrate_interval: Option<FieldText>,
    pub battery_warning: Option<FieldText>,
}

impl ConfigMessage {
    pub fn decode(data: &[u8]) -> Self {
        let mut msg = Self::default();

        let mut i = 0;
        while i + 2 <= data.len() {
            let key = data[i];
            let len = data[i + 1] as usize;
            let Some(value) = data.get(i + 2..i + 2 + len) else {
                warn!("Config record {} truncated", key);
                break;
            };

            match key {
                KEY_VIBRATE_ON_BT_LOST => msg.vibrate_on_bluetooth_lost = decode_int(value),
                KEY_VIBRATE_INTERVAL => msg.vibrate_interval = decode_text(value),
                KEY_BATTERY_WARNING => msg.battery_warning = decode_text(value),
                _ => debug!("Skipping unknown config key {}", key),
            }
            i += 2 + len;
        }
        msg
    }

    pub fn is_empty(&self) -> bool {
        self.vibrate_on_bluetooth_lost.is_none()
            && self.vibrate_interval.is_none()
            && self.battery_warning.is_none()
    }

    /// Fold a later message into this one so that applying the result
    /// matches applying both in order. A later text field that would be
    /// rejected does not displace an earlier one.
    pub fn merge(&mut self, later: ConfigMessage) {
        if later.vibrate_on_bluetooth_lost.is_some() {
            self.vibrate_on_bluetooth_lost = later.vibrate_on_bluetooth_lost;
        }
        merge_text(
            &mut self.vibrate_interval,
            later.vibrate_interval,
            ConfigField::VibrateInterval,
        );
        merge_text(
            &mut self.battery_warning,
            later.battery_warning,
            ConfigField::BatteryWarning,
        );
    }

    /// Present fields, in the order they are applied.
    pub fn fields(&self) -> impl Iterator<Item = (ConfigField, IncomingValue<'_>)> {
        [
            self.vibrate_on_bluetooth_lost
                .map(|v| (ConfigField::VibrateOnBluetoothLost, IncomingValue::Int(v))),
            self.vibrate_interval
                .as_ref()
                .map(|s| (ConfigField::VibrateInterval, IncomingValue::Text(s.as_str()))),
            self.battery_warning
                .as_ref()
                .map(|s| (ConfigField::BatteryWarning, IncomingValue::Text(s.as_str()))),
        ]
        .into_iter()
        .flatten()
    }
}

fn merge_text(slot: &mut Option<FieldText>, later: Option<FieldText>, field: ConfigField) {
    let Some(later) = later else {
        return;
    };
    let accepted = Settings::default().apply_incoming(field, IncomingValue::Text(later.as_str()));
    if accepted || slot.is_none() {
        *slot = Some(later);
    }
}

/// Little-endian signed integer of 1..=4 bytes, sign-extended.
fn decode_int(value: &[u8]) -> Option<i32> {
    if value.is_empty() || value.len() > 4 {
        warn!("Config int of {} bytes dropped", value.len());
        return None;
    }
    let negative = value[value.len() - 1] & 0x80 != 0;
    let mut bytes = if negative { [0xFF; 4] } else { [0x00; 4] };
    bytes[..value.len()].copy_from_slice(value);
    Some(i32::from_le_bytes(bytes))
}

/// UTF-8 text, trailing NULs stripped. Inner NULs are kept so the value
/// fails to parse later.
fn decode_text(value: &[u8]) -> Option<FieldText> {
    let Ok(text) = core::str::from_utf8(value) else {
        warn!("Config text is not UTF-8");
        return None;
    };
    let text = text.trim_end_matches('\0');
    let mut out = FieldText::new();
    if out.push_str(text).is_err() {
        warn!("Config text of {} bytes dropped", text.len());
        return None;
    }
    Some(out)
}
