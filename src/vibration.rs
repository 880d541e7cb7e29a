//! Vibration motor driver.
//!
//! The watch face requests patterns synchronously through [`MotorVibes`];
//! [`motor_task`] plays them. A request arriving while a pattern plays
//! replaces any request still waiting.

use defmt::{debug, Format};
use embassy_nrf::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use piano::config::{VIBE_DOUBLE_PULSE_MS, VIBE_SHORT_PULSE_MS};
use piano::Vibes;

#[derive(Clone, Copy, Format)]
pub enum Pattern {
    Short,
    Double,
}

static PATTERN: Signal<CriticalSectionRawMutex, Pattern> = Signal::new();

/// [`Vibes`] handle for the watch face.
pub struct MotorVibes;

impl Vibes for MotorVibes {
    fn short_pulse(&mut self) {
        PATTERN.signal(Pattern::Short);
    }

    fn double_pulse(&mut self) {
        PATTERN.signal(Pattern::Double);
    }
}

/// Motor enable pin is active-low.
struct Motor {
    pin: Output<'static>,
}

impl Motor {
    async fn pulse(&mut self, ms: u64) {
        self.pin.set_low();
        Timer::after_millis(ms).await;
        self.pin.set_high();
    }
}

#[embassy_executor::task]
pub async fn motor_task(pin: Output<'static>) -> ! {
    let mut motor = Motor { pin };
    loop {
        let pattern = PATTERN.wait().await;
        debug!("Vibe: {:?}", pattern);
        match pattern {
            Pattern::Short => motor.pulse(VIBE_SHORT_PULSE_MS).await,
            Pattern::Double => {
                motor.pulse(VIBE_DOUBLE_PULSE_MS).await;
                Timer::after_millis(VIBE_DOUBLE_PULSE_MS).await;
                motor.pulse(VIBE_DOUBLE_PULSE_MS).await;
            }
        }
    }
}
