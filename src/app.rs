//! Watch face application context and event dispatch.
//!
//! [`WatchFace`] owns the settings, the status flags and the
//! pending-redraw flag. A single task feeds it [`Event`]s in delivery
//! order and renders whenever [`WatchFace::take_redraw`] says so; nothing
//! else touches this state.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::clock::LocalTime;
use crate::message::ConfigMessage;
use crate::power::BatteryChargeState;
use crate::settings::{Settings, SettingsStorage};
use crate::status::Status;
use crate::ui::piano::{draw_piano_roll, HOUR_ROW_Y, MINUTE_ROW_Y};
use crate::ui::{Glyph, GlyphLayer, Layout, BACKGROUND};

/// Vibration motor patterns.
pub trait Vibes {
    fn short_pulse(&mut self);
    fn double_pulse(&mut self);
}

/// Host query: is do-not-disturb active right now?
pub trait QuietTime {
    fn is_quiet_time(&self) -> bool;
}

impl QuietTime for bool {
    fn is_quiet_time(&self) -> bool {
        *self
    }
}

/// Inputs delivered to the watch face.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Start of a new minute.
    Tick(LocalTime),
    Battery(BatteryChargeState),
    /// Phone link up (`true`) or down.
    Bluetooth(bool),
    Config(ConfigMessage),
}

/// Whether a tick at `minute` triggers the periodic vibration.
pub fn interval_elapsed(minute: u8, interval_minutes: u16) -> bool {
    match interval_minutes {
        0 => false,
        60 => minute == 0,
        n => minute as u16 % n == 0,
    }
}

pub struct WatchFace {
    settings: Settings,
    status: Status,
    layout: Layout,
    redraw_pending: bool,
}

impl WatchFace {
    pub fn new(settings: Settings, layout: Layout) -> Self {
        Self {
            settings,
            status: Status::default(),
            layout,
            redraw_pending: true,
        }
    }

    /// Face shown: reset status, seed quiet hours, schedule the first frame.
    pub fn start<Q: QuietTime>(&mut self, quiet: &Q) {
        self.status.clear();
        self.status.set_quiet_time(quiet.is_quiet_time());
        self.request_redraw();
        info!("Watch face started");
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// Return and clear the pending-redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        core::mem::take(&mut self.redraw_pending)
    }

    /// Dispatch one event to its handler.
    pub fn handle<Q, V, S>(
        &mut self,
        event: &Event,
        quiet: &Q,
        vibes: &mut V,
        storage: &mut S,
    ) -> Result<(), S::Error>
    where
        Q: QuietTime,
        V: Vibes,
        S: SettingsStorage,
    {
        match event {
            Event::Tick(time) => self.on_tick(*time, quiet, vibes),
            Event::Battery(state) => self.on_battery(*state),
            Event::Bluetooth(connected) => self.on_bluetooth(*connected, vibes),
            Event::Config(msg) => return self.on_config(msg, storage),
        }
        Ok(())
    }

    pub fn on_tick<Q: QuietTime, V: Vibes>(&mut self, time: LocalTime, quiet: &Q, vibes: &mut V) {
        self.status.set_quiet_time(quiet.is_quiet_time());

        if interval_elapsed(time.minute, self.settings.vibrate_interval_minutes)
            && !self.status.is_quiet_time()
        {
            debug!("Interval vibration at {}:{}", time.hour, time.minute);
            vibes.short_pulse();
        }

        self.request_redraw();
    }

    pub fn on_battery(&mut self, state: BatteryChargeState) {
        debug!(
            "Battery: {}% charging={} plugged={} warn={}%",
            state.charge_percent,
            state.is_charging,
            state.is_plugged,
            self.settings.battery_warning_percent
        );
        let discharged = state.charge_percent <= self.settings.battery_warning_percent;
        let charging = state.is_charging || state.is_plugged;

        let discharged_changed = self.status.set_battery_discharged(discharged);
        let charging_changed = self.status.set_charging(charging);
        if discharged_changed || charging_changed {
            self.request_redraw();
        }
    }

    pub fn on_bluetooth<V: Vibes>(&mut self, connected: bool, vibes: &mut V) {
        if self.status.is_bluetooth_connected()
            && !connected
            && !self.status.is_quiet_time()
            && self.settings.vibrate_on_bluetooth_lost
        {
            vibes.double_pulse();
        }

        if self.status.set_bluetooth_connected(connected) {
            info!("Bluetooth connected={}", connected);
            self.request_redraw();
        }
    }

    /// Apply every present field, refresh glyphs and persist once.
    pub fn on_config<S: SettingsStorage>(
        &mut self,
        msg: &ConfigMessage,
        storage: &mut S,
    ) -> Result<(), S::Error> {
        for (field, value) in msg.fields() {
            self.settings.apply_incoming(field, value);
        }

        self.status.mark_changed();
        self.request_redraw();

        self.settings.save(storage)
    }

    /// Draw a full frame.
    ///
    /// Glyph visibility is only rewritten when the status changed since
    /// the previous frame.
    pub fn render<Q, D, G>(
        &mut self,
        time: LocalTime,
        quiet: &Q,
        target: &mut D,
        glyphs: &mut G,
    ) -> Result<(), D::Error>
    where
        Q: QuietTime,
        D: DrawTarget<Color = Rgb565>,
        G: GlyphLayer,
    {
        self.status.set_quiet_time(quiet.is_quiet_time());

        target.clear(BACKGROUND)?;
        draw_piano_roll(target, &self.layout, HOUR_ROW_Y, time.hour)?;
        draw_piano_roll(target, &self.layout, MINUTE_ROW_Y, time.minute)?;

        if self.status.consume_changed() {
            glyphs.set_hidden(Glyph::BluetoothLost, self.status.is_bluetooth_connected());
            glyphs.set_hidden(Glyph::Charging, !self.status.is_charging());
            glyphs.set_hidden(Glyph::QuietTime, !self.status.is_quiet_time());
            glyphs.set_hidden(Glyph::BatteryLow, !self.status.is_battery_discharged());
            self.status.acknowledge();
        }

        glyphs.draw(target)
    }
}
