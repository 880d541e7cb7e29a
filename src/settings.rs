//! User settings, set from the companion app and persisted across restarts.
//!
//! Blob layout (fixed, 4 bytes):
//! ```text
//! Byte 0:   vibrate on bluetooth lost (0 / 1)
//! Byte 1:   battery warning percent (0..=100)
//! Byte 2-3: vibrate interval minutes, little-endian (0 = off, 1..=60)
//! ```

use crate::config::{
    DEFAULT_BATTERY_WARNING_PERCENT, DEFAULT_VIBRATE_INTERVAL_MINUTES, DEFAULT_VIBRATE_ON_BT_LOST,
    MAX_BATTERY_WARNING_PERCENT, MAX_VIBRATE_INTERVAL_MINUTES, SETTINGS_KEY,
};
use crate::error::Error;

/// Serialized settings size in bytes.
pub const SETTINGS_BLOB_LEN: usize = 4;

/// Key-value persistence provided by the host.
///
/// `read` returns `Ok(None)` when nothing is stored under `key`.
pub trait SettingsStorage {
    type Error;

    fn read(&mut self, key: u8, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;

    fn write(&mut self, key: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Fields a configuration message may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    VibrateOnBluetoothLost,
    VibrateInterval,
    BatteryWarning,
}

/// Raw value of an incoming field, before validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncomingValue<'a> {
    Int(i32),
    Text(&'a str),
}

impl IncomingValue<'_> {
    fn as_int(&self) -> Option<i32> {
        match self {
            IncomingValue::Int(v) => Some(*v),
            IncomingValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Battery is "discharged" at or below this charge percent.
    pub battery_warning_percent: u8,
    /// Short pulse every N minutes; 0 disables, 60 means on the hour.
    pub vibrate_interval_minutes: u16,
    /// Double pulse when the phone disconnects.
    pub vibrate_on_bluetooth_lost: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            battery_warning_percent: DEFAULT_BATTERY_WARNING_PERCENT,
            vibrate_interval_minutes: DEFAULT_VIBRATE_INTERVAL_MINUTES,
            vibrate_on_bluetooth_lost: DEFAULT_VIBRATE_ON_BT_LOST,
        }
    }
}

impl Settings {
    /// Reset every field to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace the current values with the persisted ones, if any.
    ///
    /// A missing, unreadable or corrupt record leaves the current values
    /// untouched.
    pub fn load<S: SettingsStorage>(&mut self, storage: &mut S) {
        let mut buf = [0u8; SETTINGS_BLOB_LEN];
        match storage.read(SETTINGS_KEY, &mut buf) {
            Ok(Some(len)) => match Self::decode(&buf[..len.min(SETTINGS_BLOB_LEN)]) {
                Ok(loaded) => {
                    *self = loaded;
                    info!(
                        "Settings loaded: warn={}% interval={}min bt_vibe={}",
                        self.battery_warning_percent,
                        self.vibrate_interval_minutes,
                        self.vibrate_on_bluetooth_lost
                    );
                }
                Err(_) => warn!("Stored settings corrupt - keeping defaults"),
            },
            Ok(None) => info!("No stored settings - using defaults"),
            Err(_) => warn!("Settings read failed - keeping defaults"),
        }
    }

    /// Persist the current values.
    pub fn save<S: SettingsStorage>(&self, storage: &mut S) -> Result<(), S::Error> {
        storage.write(SETTINGS_KEY, &self.encode())?;
        debug!("Settings saved");
        Ok(())
    }

    /// Validate and apply one incoming field.
    ///
    /// Returns `false` and leaves the field unchanged when the value does
    /// not parse or is out of range.
    pub fn apply_incoming(&mut self, field: ConfigField, value: IncomingValue<'_>) -> bool {
        let Some(raw) = value.as_int() else {
            warn!("Ignoring unparsable value for {}", field);
            return false;
        };

        match field {
            ConfigField::VibrateOnBluetoothLost => {
                self.vibrate_on_bluetooth_lost = raw == 1;
            }
            ConfigField::VibrateInterval => {
                match u16::try_from(raw) {
                    Ok(minutes) if minutes <= MAX_VIBRATE_INTERVAL_MINUTES => {
                        self.vibrate_interval_minutes = minutes;
                    }
                    _ => {
                        warn!("Vibrate interval {} out of range", raw);
                        return false;
                    }
                }
            }
            ConfigField::BatteryWarning => match u8::try_from(raw) {
                Ok(percent) if percent <= MAX_BATTERY_WARNING_PERCENT => {
                    self.battery_warning_percent = percent;
                }
                _ => {
                    warn!("Battery warning {} out of range", raw);
                    return false;
                }
            },
        }
        true
    }

    /// Serialize to the fixed blob layout.
    pub fn encode(&self) -> [u8; SETTINGS_BLOB_LEN] {
        let interval = self.vibrate_interval_minutes.to_le_bytes();
        [
            self.vibrate_on_bluetooth_lost as u8,
            self.battery_warning_percent,
            interval[0],
            interval[1],
        ]
    }

    /// Deserialize from the fixed blob layout.
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let [flag, percent, lo, hi] = data else {
            return Err(Error::StorageCorrupt);
        };
        let vibrate_on_bluetooth_lost = match flag {
            0 => false,
            1 => true,
            _ => return Err(Error::StorageCorrupt),
        };
        let vibrate_interval_minutes = u16::from_le_bytes([*lo, *hi]);
        if *percent > MAX_BATTERY_WARNING_PERCENT
            || vibrate_interval_minutes > MAX_VIBRATE_INTERVAL_MINUTES
        {
            return Err(Error::StorageCorrupt);
        }
        Ok(Self {
            battery_warning_percent: *percent,
            vibrate_interval_minutes,
            vibrate_on_bluetooth_lost,
        })
    }
}
