//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, layout and storage
//! constants live here so they can be tuned in one place.

use embedded_graphics::geometry::Point;

use crate::ui::Shape;

// Settings

/// Persistent storage key of the settings blob.
pub const SETTINGS_KEY: u8 = 1;

/// Battery percentage at or below which the battery glyph is shown.
pub const DEFAULT_BATTERY_WARNING_PERCENT: u8 = 30;

/// Periodic vibration interval in minutes (0 = off).
pub const DEFAULT_VIBRATE_INTERVAL_MINUTES: u16 = 0;

/// Double-pulse when the phone link drops.
pub const DEFAULT_VIBRATE_ON_BT_LOST: bool = true;

/// Largest accepted vibration interval (once an hour, on the hour).
pub const MAX_VIBRATE_INTERVAL_MINUTES: u16 = 60;

/// Largest accepted battery warning threshold.
pub const MAX_BATTERY_WARNING_PERCENT: u8 = 100;

// Clock

/// Offset of local time from UTC (seconds).
pub const UTC_OFFSET_SECS: i32 = 0;

/// Quiet hours start (inclusive, local hour).
pub const QUIET_START_HOUR: u8 = 22;

/// Quiet hours end (exclusive, local hour). Equal to the start disables
/// quiet hours.
pub const QUIET_END_HOUR: u8 = 7;

// Battery

/// How often the battery is sampled (seconds).
pub const BATTERY_POLL_SECS: u64 = 30;

// Vibration

/// Length of a single motor pulse (ms).
pub const VIBE_SHORT_PULSE_MS: u64 = 200;

/// Length of each half of a double pulse, and the pause between them (ms).
pub const VIBE_DOUBLE_PULSE_MS: u64 = 150;

// Display

/// Panel resolution (ST7789).
pub const DISPLAY_WIDTH: u16 = 240;
pub const DISPLAY_HEIGHT: u16 = 240;

/// Panel shape selects the key and glyph origins.
pub const PANEL_SHAPE: Shape = Shape::Rect;

/// Top-left corner of the 144x168 face on the panel (centred on 240x240).
pub const FACE_ORIGIN: Point = Point::new(48, 36);

// BLE

/// GAP device name advertised to the companion app.
pub const BLE_DEVICE_NAME: &str = "Piano";

/// Largest configuration message the GATT characteristic accepts.
pub const CONFIG_MESSAGE_MAX_LEN: usize = 64;

// GPIO pin assignments (custom nRF52840 wrist board)
//
//   Display SCK       → P0.02
//   Display MOSI      → P0.03
//   Display CS        → P0.25
//   Display DC        → P0.18
//   Display RESET     → P0.26
//   Backlight         → P0.23
//   Vibration motor   → P0.16 (active-low)
//   Charge indication → P0.12 (low = charging)
//   Power present     → P0.19 (low = plugged)
//   Battery voltage   → P0.31 / AIN7

// Settings storage

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 248;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 2;
