//! Wall-clock helpers: local time of day and the quiet-hours window.

use chrono::{DateTime, FixedOffset, Timelike};

/// Local time of day at minute resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
}

impl LocalTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Local time for a UTC epoch timestamp shifted by `utc_offset_secs`.
    pub fn from_timestamp(utc_secs: i64, utc_offset_secs: i32) -> Option<Self> {
        let zone = FixedOffset::east_opt(utc_offset_secs)?;
        let local = DateTime::from_timestamp(utc_secs, 0)?.with_timezone(&zone);
        Self::new(local.hour() as u8, local.minute() as u8)
    }
}

/// Seconds from `utc_secs` to the start of the next minute (1..=60).
pub fn secs_until_next_minute(utc_secs: i64) -> u64 {
    (60 - utc_secs.rem_euclid(60)) as u64
}

/// Daily do-not-disturb window, `[start_hour, end_hour)` in local time.
///
/// Wraps past midnight when `end_hour < start_hour`; `start_hour ==
/// end_hour` disables it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuietWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl QuietWindow {
    pub const fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, time: LocalTime) -> bool {
        let h = time.hour;
        if self.start_hour == self.end_hour {
            false
        } else if self.start_hour < self.end_hour {
            h >= self.start_hour && h < self.end_hour
        } else {
            h >= self.start_hour || h < self.end_hour
        }
    }
}
