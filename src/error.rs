//! Unified error type for the watch face.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Flash read/write/erase failed.
    Storage,

    /// A persisted record exists but does not decode.
    StorageCorrupt,

    // Display
    /// SPI transaction to the panel failed or the panel did not initialise.
    Display,

    // BLE
    /// The SoftDevice rejected a GAP / GATT call.
    Ble(BleError),

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// BLE failures we report (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GATT server attribute registration failed.
    Register,
    /// Connectable advertising could not start or timed out.
    Advertise,
}

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
