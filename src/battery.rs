//! Battery monitor: SAADC voltage plus charger status pins.

use defmt::info;
use embassy_nrf::gpio::Input;
use embassy_nrf::saadc::Saadc;
use embassy_time::Timer;
use piano::config::BATTERY_POLL_SECS;
use piano::power::{charge_percent_from_millivolts, millivolts_from_sample};
use piano::{BatteryChargeState, Event};

use crate::EventSender;

pub struct Battery {
    adc: Saadc<'static, 1>,
    /// High = battery, low = charging.
    charge_indication: Input<'static>,
    /// Low = external power present.
    power_present: Input<'static>,
}

impl Battery {
    pub fn new(
        adc: Saadc<'static, 1>,
        charge_indication: Input<'static>,
        power_present: Input<'static>,
    ) -> Self {
        Self {
            adc,
            charge_indication,
            power_present,
        }
    }

    pub async fn read(&mut self) -> BatteryChargeState {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        let mv = millivolts_from_sample(buf[0]);

        BatteryChargeState {
            charge_percent: charge_percent_from_millivolts(mv),
            is_charging: self.charge_indication.is_low(),
            is_plugged: self.power_present.is_low(),
        }
    }
}

/// Sample the battery periodically and report changes.
#[embassy_executor::task]
pub async fn battery_task(mut battery: Battery, events: EventSender) -> ! {
    let mut last: Option<BatteryChargeState> = None;
    loop {
        let state = battery.read().await;
        if last != Some(state) {
            info!(
                "Battery {}% charging={} plugged={}",
                state.charge_percent, state.is_charging, state.is_plugged
            );
            events.send(Event::Battery(state)).await;
            last = Some(state);
        }

        Timer::after_secs(BATTERY_POLL_SECS).await;
    }
}
