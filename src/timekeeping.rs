//! Wall clock and minute ticks.
//!
//! There is no RTC backup on the board: time starts at the build
//! timestamp and advances with the embassy time driver.

use defmt::{debug, warn};
use embassy_time::{Instant, Timer};
use piano::clock::secs_until_next_minute;
use piano::config::{QUIET_END_HOUR, QUIET_START_HOUR, UTC_OFFSET_SECS};
use piano::{Event, LocalTime, QuietTime, QuietWindow};

use crate::EventSender;

include!(concat!(env!("OUT_DIR"), "/build_epoch.rs"));

pub fn utc_now() -> i64 {
    BUILD_EPOCH_SECS + Instant::now().as_secs() as i64
}

pub fn local_now() -> Option<LocalTime> {
    LocalTime::from_timestamp(utc_now(), UTC_OFFSET_SECS)
}

/// Do-not-disturb from the configured nightly window.
pub struct QuietHours {
    window: QuietWindow,
}

impl QuietHours {
    pub const fn new() -> Self {
        Self {
            window: QuietWindow::new(QUIET_START_HOUR, QUIET_END_HOUR),
        }
    }
}

impl QuietTime for QuietHours {
    fn is_quiet_time(&self) -> bool {
        local_now().is_some_and(|now| self.window.contains(now))
    }
}

/// Emit a tick at the start of every minute.
#[embassy_executor::task]
pub async fn tick_task(events: EventSender) -> ! {
    loop {
        Timer::after_secs(secs_until_next_minute(utc_now())).await;

        match local_now() {
            Some(now) => {
                debug!("Tick {}:{}", now.hour, now.minute);
                events.send(Event::Tick(now)).await;
            }
            None => warn!("Clock out of range"),
        }
    }
}
