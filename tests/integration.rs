//! Integration tests for the piano watch face host-testable logic.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use piano::ui::piano::{big_key_bounds, HOUR_ROW_Y, MINUTE_ROW_Y};
use piano::ui::{BACKGROUND, KEY_LIT, KEY_WHITE};
use piano::{
    highlighted_keys, BatteryChargeState, ConfigMessage, Event, Glyph, GlyphLayer, GlyphSet,
    Layout, LocalTime, Settings, SettingsStorage, Shape, Vibes, WatchFace,
};

#[derive(Default)]
struct VibeLog {
    short: usize,
    double: usize,
}

impl Vibes for VibeLog {
    fn short_pulse(&mut self) {
        self.short += 1;
    }
    fn double_pulse(&mut self) {
        self.double += 1;
    }
}

#[derive(Default)]
struct MemStore {
    items: Vec<(u8, Vec<u8>)>,
}

impl SettingsStorage for MemStore {
    type Error = Infallible;

    fn read(&mut self, key: u8, buf: &mut [u8]) -> Result<Option<usize>, Infallible> {
        Ok(self.items.iter().find(|(k, _)| *k == key).map(|(_, data)| {
            buf[..data.len()].copy_from_slice(data);
            data.len()
        }))
    }

    fn write(&mut self, key: u8, data: &[u8]) -> Result<(), Infallible> {
        self.items.retain(|(k, _)| *k != key);
        self.items.push((key, data.to_vec()));
        Ok(())
    }
}

/// Heap-backed 240x240 panel.
struct Panel {
    pixels: Vec<Rgb565>,
}

impl Panel {
    fn new() -> Self {
        Self {
            pixels: vec![Rgb565::RED; 240 * 240],
        }
    }

    fn at(&self, p: Point) -> Rgb565 {
        self.pixels[p.y as usize * 240 + p.x as usize]
    }
}

impl OriginDimensions for Panel {
    fn size(&self) -> Size {
        Size::new(240, 240)
    }
}

impl DrawTarget for Panel {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, color) in pixels {
            if (0..240).contains(&p.x) && (0..240).contains(&p.y) {
                self.pixels[p.y as usize * 240 + p.x as usize] = color;
            }
        }
        Ok(())
    }
}

/// Records visibility updates instead of drawing.
#[derive(Default)]
struct GlyphLog {
    updates: usize,
    hidden: [bool; 4],
}

impl GlyphLayer for GlyphLog {
    fn set_hidden(&mut self, glyph: Glyph, hidden: bool) {
        self.updates += 1;
        self.hidden[glyph.index()] = hidden;
    }

    fn draw<D>(&self, _target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Ok(())
    }
}

fn layout() -> Layout {
    Layout::new(Shape::Rect, Point::new(48, 36))
}

fn started_face(settings: Settings) -> WatchFace {
    let mut face = WatchFace::new(settings, layout());
    face.start(&false);
    face
}

fn time(hour: u8, minute: u8) -> LocalTime {
    LocalTime::new(hour, minute).unwrap()
}

#[test]
fn low_battery_with_default_settings() {
    let mut face = started_face(Settings::default());
    let mut store = MemStore::default();

    face.handle(
        &Event::Battery(BatteryChargeState {
            charge_percent: 25,
            is_charging: false,
            is_plugged: false,
        }),
        &false,
        &mut VibeLog::default(),
        &mut store,
    )
    .unwrap();

    assert!(face.status().is_battery_discharged());
    assert!(!face.status().is_charging());
    assert!(face.status().consume_changed());
}

#[test]
fn quarter_hour_interval_vibrates_at_half_past() {
    let mut face = started_face(Settings {
        vibrate_interval_minutes: 15,
        ..Settings::default()
    });
    let mut vibes = VibeLog::default();

    face.handle(&Event::Tick(time(9, 30)), &false, &mut vibes, &mut MemStore::default())
        .unwrap();
    assert_eq!(vibes.short, 1);
}

#[test]
fn hourly_interval_vibrates_on_the_hour() {
    let mut face = started_face(Settings {
        vibrate_interval_minutes: 60,
        ..Settings::default()
    });
    let mut vibes = VibeLog::default();

    face.handle(&Event::Tick(time(9, 0)), &false, &mut vibes, &mut MemStore::default())
        .unwrap();
    assert_eq!(vibes.short, 1);
}

#[test]
fn bluetooth_loss_double_pulses_and_flags_change() {
    let mut face = started_face(Settings::default());
    let mut vibes = VibeLog::default();
    let mut store = MemStore::default();

    face.handle(&Event::Bluetooth(true), &false, &mut vibes, &mut store)
        .unwrap();
    face.handle(&Event::Bluetooth(false), &false, &mut vibes, &mut store)
        .unwrap();

    assert_eq!(vibes.double, 1);
    assert!(!face.status().is_bluetooth_connected());
    assert!(face.status().consume_changed());
}

#[test]
fn midnight_lights_first_big_key_only() {
    let keys = highlighted_keys(0);
    assert_eq!(keys.big, 1);
    assert_eq!(keys.small, None);
}

#[test]
fn config_message_persists_across_restart() {
    let mut store = MemStore::default();
    let mut face = started_face(Settings::default());

    // vibrate_on_bt_lost = 0, interval = "10", battery = "45"
    let msg = ConfigMessage::decode(&[1, 1, 0, 2, 2, b'1', b'0', 3, 2, b'4', b'5']);
    face.handle(&Event::Config(msg), &false, &mut VibeLog::default(), &mut store)
        .unwrap();

    let mut reloaded = Settings::default();
    reloaded.load(&mut store);
    assert_eq!(reloaded, *face.settings());
    assert_eq!(reloaded.vibrate_interval_minutes, 10);
    assert_eq!(reloaded.battery_warning_percent, 45);
    assert!(!reloaded.vibrate_on_bluetooth_lost);
}

#[test]
fn malformed_interval_keeps_previous_value() {
    let mut store = MemStore::default();
    let mut face = started_face(Settings {
        vibrate_interval_minutes: 15,
        ..Settings::default()
    });

    let msg = ConfigMessage::decode(&[2, 3, b'a', b'b', b'c']);
    face.take_redraw();
    face.handle(&Event::Config(msg), &false, &mut VibeLog::default(), &mut store)
        .unwrap();

    assert_eq!(face.settings().vibrate_interval_minutes, 15);
    assert!(face.take_redraw());
}

#[test]
fn glyphs_only_toggle_when_status_changed() {
    let mut face = started_face(Settings::default());
    let mut panel = Panel::new();
    let mut glyphs = GlyphLog::default();

    face.render(time(10, 0), &false, &mut panel, &mut glyphs).unwrap();
    assert_eq!(glyphs.updates, 4);
    assert!(!glyphs.hidden[Glyph::BluetoothLost.index()]);
    assert!(glyphs.hidden[Glyph::Charging.index()]);

    // Nothing changed: keys are redrawn, glyphs left alone.
    face.render(time(10, 1), &false, &mut panel, &mut glyphs).unwrap();
    assert_eq!(glyphs.updates, 4);

    face.handle(
        &Event::Bluetooth(true),
        &false,
        &mut VibeLog::default(),
        &mut MemStore::default(),
    )
    .unwrap();
    face.render(time(10, 2), &false, &mut panel, &mut glyphs).unwrap();
    assert_eq!(glyphs.updates, 8);
    assert!(glyphs.hidden[Glyph::BluetoothLost.index()]);
}

#[test]
fn quiet_glyph_follows_quiet_hours() {
    let mut face = started_face(Settings::default());
    let mut panel = Panel::new();
    let mut glyphs = GlyphLog::default();

    face.render(time(21, 59), &false, &mut panel, &mut glyphs).unwrap();
    assert!(glyphs.hidden[Glyph::QuietTime.index()]);

    face.render(time(22, 0), &true, &mut panel, &mut glyphs).unwrap();
    assert_eq!(glyphs.updates, 8);
    assert!(!glyphs.hidden[Glyph::QuietTime.index()]);

    face.render(time(22, 1), &true, &mut panel, &mut glyphs).unwrap();
    assert_eq!(glyphs.updates, 8);

    face.render(time(7, 0), &false, &mut panel, &mut glyphs).unwrap();
    assert_eq!(glyphs.updates, 12);
    assert!(glyphs.hidden[Glyph::QuietTime.index()]);
}

#[test]
fn config_text_with_inner_nul_is_rejected() {
    let mut store = MemStore::default();
    let mut face = started_face(Settings {
        vibrate_interval_minutes: 15,
        ..Settings::default()
    });

    let msg = ConfigMessage::decode(&[2, 3, b'1', 0, b'5']);
    face.handle(&Event::Config(msg), &false, &mut VibeLog::default(), &mut store)
        .unwrap();
    assert_eq!(face.settings().vibrate_interval_minutes, 15);
}

#[test]
fn frame_lights_tens_keys() {
    let mut face = started_face(Settings::default());
    let mut panel = Panel::new();
    let mut glyphs = GlyphSet::new(*face.layout());

    face.render(time(10, 42), &false, &mut panel, &mut glyphs).unwrap();

    // Sample the lower half of each big key, below the black keys.
    let sample = |r: Rectangle| r.top_left + Point::new(7, 50);
    let l = layout();

    // Hour 10: tens 1 lights big key index 1.
    assert_eq!(panel.at(sample(big_key_bounds(&l, HOUR_ROW_Y, 1))), KEY_LIT);
    assert_eq!(panel.at(sample(big_key_bounds(&l, HOUR_ROW_Y, 0))), KEY_WHITE);
    // Minute 42: tens 4 lights big key index 4.
    assert_eq!(panel.at(sample(big_key_bounds(&l, MINUTE_ROW_Y, 4))), KEY_LIT);
    assert_eq!(panel.at(sample(big_key_bounds(&l, MINUTE_ROW_Y, 1))), KEY_WHITE);

    // The frame clears the whole panel first.
    assert_eq!(panel.at(Point::new(0, 0)), BACKGROUND);
    assert_eq!(panel.at(Point::new(239, 239)), BACKGROUND);
}
