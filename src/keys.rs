//! Digit-to-keyboard mapping.
//!
//! A value 0..=59 is shown on one octave-and-a-bit of piano keys:
//! ```text
//!   small (black) slots:  0 1 _ 3 4 5 _ 7 8
//!   big (white) keys:    1 2 3 4 5 6 7 8 9
//! ```
//! The tens digit lights big key `tens + 1`. The ones digit lights the
//! small key whose slot matches it: slots 0 and 1 carry digits 1 and 2,
//! slots 3..=8 carry their own number. Slots 2 and 6 are the gaps between
//! E-F and B-C and are never drawn, so ones digits 0, 6 and 9 light no
//! small key.

/// Number of big (white) keys per row.
pub const BIG_KEY_COUNT: u8 = 9;

/// Number of small (black) key slots per row, gaps included.
pub const SMALL_KEY_SLOTS: u8 = 9;

/// Largest value a row can show.
pub const MAX_VALUE: u8 = 59;

/// Keys lit for one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyHighlight {
    /// 1-based big key index, 1..=9.
    pub big: u8,
    /// 0-based small key slot, never a gap.
    pub small: Option<u8>,
}

pub const fn tens(value: u8) -> u8 {
    value / 10
}

pub const fn ones(value: u8) -> u8 {
    value % 10
}

/// Slots with no black key above them.
pub const fn is_gap(slot: u8) -> bool {
    slot == 2 || slot == 6
}

/// Digit carried by a non-gap small slot.
const fn slot_digit(slot: u8) -> u8 {
    if slot < 2 {
        slot + 1
    } else {
        slot
    }
}

/// Map a value to its lit keys. Values above 59 are clamped.
pub fn highlighted_keys(value: u8) -> KeyHighlight {
    let value = value.min(MAX_VALUE);
    let digit = ones(value);
    let small = (0..SMALL_KEY_SLOTS)
        .filter(|&slot| !is_gap(slot))
        .find(|&slot| slot_digit(slot) == digit);

    KeyHighlight {
        big: tens(value) + 1,
        small,
    }
}
