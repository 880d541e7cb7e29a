//! Piano watch face - host-testable core.
//!
//! The hour and minute are each shown as a row of piano keys: the tens
//! digit lights a white key, the ones digit a black key. Four glyphs show
//! bluetooth loss, charging, low battery and quiet hours.
//!
//! This library holds everything that does not touch hardware: settings,
//! status tracking, key mapping, rendering through `embedded-graphics`,
//! message decoding and event dispatch. The embedded binary (`main.rs`,
//! feature `embedded`) wires it to the nRF52840, the SoftDevice and the
//! display.
//!
//! Usage: `cargo test` runs everything here on the host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod keys;
pub mod message;
pub mod power;
pub mod settings;
pub mod status;
pub mod ui;

pub use app::{Event, QuietTime, Vibes, WatchFace};
pub use clock::{LocalTime, QuietWindow};
pub use error::Error;
pub use keys::{highlighted_keys, KeyHighlight};
pub use message::ConfigMessage;
pub use power::BatteryChargeState;
pub use settings::{ConfigField, IncomingValue, Settings, SettingsStorage};
pub use status::Status;
pub use ui::glyphs::GlyphSet;
pub use ui::{Glyph, GlyphLayer, Layout, Shape};
