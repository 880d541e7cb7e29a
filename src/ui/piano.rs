//! One keyboard row per value: 9 white keys with 7 black keys on top.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{CornerRadii, PrimitiveStyle, Rectangle, RoundedRectangle};

use super::{Layout, KEY_BLACK, KEY_LIT, KEY_WHITE};
use crate::keys::{highlighted_keys, is_gap, BIG_KEY_COUNT, SMALL_KEY_SLOTS};

/// Top of the hour row, relative to the face.
pub const HOUR_ROW_Y: i32 = 28;
/// Top of the minute row, relative to the face.
pub const MINUTE_ROW_Y: i32 = 100;

/// Horizontal distance between neighbouring keys.
pub const KEY_PITCH: i32 = 16;
pub const BIG_KEY_SIZE: Size = Size::new(14, 58);
pub const SMALL_KEY_SIZE: Size = Size::new(9, 36);
/// Lit marker inside a small key.
pub const SMALL_KEY_INSET: Size = Size::new(5, 34);
const SMALL_KEY_INSET_X: i32 = 2;

const KEY_RADIUS: u32 = 2;
const INSET_RADIUS: u32 = 1;

/// Rectangle with square top corners and rounded bottom corners.
fn bottom_rounded(bounds: Rectangle, radius: u32) -> RoundedRectangle {
    let r = Size::new(radius, radius);
    RoundedRectangle::new(
        bounds,
        CornerRadii {
            top_left: Size::zero(),
            top_right: Size::zero(),
            bottom_right: r,
            bottom_left: r,
        },
    )
}

/// Panel bounds of big key `index` (0-based) in the row at `y`.
pub fn big_key_bounds(layout: &Layout, y: i32, index: u8) -> Rectangle {
    let x = layout.big_key_x() + index as i32 * KEY_PITCH;
    Rectangle::new(layout.origin + Point::new(x, y), BIG_KEY_SIZE)
}

/// Panel bounds of small key `slot` in the row at `y`.
pub fn small_key_bounds(layout: &Layout, y: i32, slot: u8) -> Rectangle {
    let x = layout.small_key_x() + slot as i32 * KEY_PITCH;
    Rectangle::new(layout.origin + Point::new(x, y), SMALL_KEY_SIZE)
}

/// Panel bounds of the lit marker inside small key `slot`.
pub fn small_key_inset_bounds(layout: &Layout, y: i32, slot: u8) -> Rectangle {
    let key = small_key_bounds(layout, y, slot);
    Rectangle::new(key.top_left + Point::new(SMALL_KEY_INSET_X, 0), SMALL_KEY_INSET)
}

/// Draw the keyboard row at `y` with the keys for `value` lit.
pub fn draw_piano_roll<D>(target: &mut D, layout: &Layout, y: i32, value: u8) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let lit = highlighted_keys(value);

    // Big keys first; the small keys overlap their upper half.
    for index in 0..BIG_KEY_COUNT {
        let color = if index + 1 == lit.big { KEY_LIT } else { KEY_WHITE };
        bottom_rounded(big_key_bounds(layout, y, index), KEY_RADIUS)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(target)?;
    }

    for slot in (0..SMALL_KEY_SLOTS).filter(|&s| !is_gap(s)) {
        bottom_rounded(small_key_bounds(layout, y, slot), KEY_RADIUS)
            .into_styled(PrimitiveStyle::with_fill(KEY_BLACK))
            .draw(target)?;

        if lit.small == Some(slot) {
            bottom_rounded(small_key_inset_bounds(layout, y, slot), INSET_RADIUS)
                .into_styled(PrimitiveStyle::with_fill(KEY_LIT))
                .draw(target)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_target::FrameBuffer;
    use crate::ui::{Shape, BACKGROUND};

    const LAYOUT: Layout = Layout::new(Shape::Rect, Point::new(48, 36));

    /// A point in the lower half of big key `index`, below the black keys.
    fn big_key_sample(y: i32, index: u8) -> Point {
        big_key_bounds(&LAYOUT, y, index).center() + Point::new(0, 20)
    }

    fn small_key_sample(y: i32, slot: u8) -> Point {
        small_key_inset_bounds(&LAYOUT, y, slot).center()
    }

    #[test]
    fn lights_tens_on_big_key_and_ones_on_small_key() {
        let mut fb = FrameBuffer::new(BACKGROUND);
        draw_piano_roll(&mut fb, &LAYOUT, MINUTE_ROW_Y, 34).unwrap();

        for index in 0..BIG_KEY_COUNT {
            let expected = if index == 3 { KEY_LIT } else { KEY_WHITE };
            assert_eq!(fb.pixel(big_key_sample(MINUTE_ROW_Y, index)), expected);
        }
        for slot in (0..SMALL_KEY_SLOTS).filter(|&s| !is_gap(s)) {
            let expected = if slot == 4 { KEY_LIT } else { KEY_BLACK };
            assert_eq!(fb.pixel(small_key_sample(MINUTE_ROW_Y, slot)), expected);
        }
    }

    #[test]
    fn zero_lights_no_small_key() {
        let mut fb = FrameBuffer::new(BACKGROUND);
        draw_piano_roll(&mut fb, &LAYOUT, HOUR_ROW_Y, 0).unwrap();

        assert_eq!(fb.pixel(big_key_sample(HOUR_ROW_Y, 0)), KEY_LIT);
        for slot in (0..SMALL_KEY_SLOTS).filter(|&s| !is_gap(s)) {
            assert_eq!(fb.pixel(small_key_sample(HOUR_ROW_Y, slot)), KEY_BLACK);
        }
    }

    #[test]
    fn gap_slots_leave_white_key_visible() {
        let mut fb = FrameBuffer::new(BACKGROUND);
        draw_piano_roll(&mut fb, &LAYOUT, HOUR_ROW_Y, 11).unwrap();

        // Left part of a gap slot sits over the white key below it.
        for gap in [2u8, 6] {
            let p = small_key_bounds(&LAYOUT, HOUR_ROW_Y, gap).top_left + Point::new(1, 18);
            assert_eq!(fb.pixel(p), KEY_WHITE);
        }
    }

    #[test]
    fn big_keys_have_rounded_bottom_corners() {
        let mut fb = FrameBuffer::new(BACKGROUND);
        draw_piano_roll(&mut fb, &LAYOUT, HOUR_ROW_Y, 0).unwrap();

        let key = big_key_bounds(&LAYOUT, HOUR_ROW_Y, 8);
        let bottom_right = key.bottom_right().unwrap();
        let bottom_left = Point::new(key.top_left.x, bottom_right.y);
        // Column between the two neighbouring black keys.
        assert_eq!(fb.pixel(key.top_left + Point::new(6, 0)), KEY_WHITE);
        assert_eq!(fb.pixel(bottom_right), BACKGROUND);
        assert_eq!(fb.pixel(bottom_left), BACKGROUND);
        assert_eq!(fb.pixel(bottom_left + Point::new(6, 0)), KEY_WHITE);
    }

    #[test]
    fn round_layout_shifts_keys() {
        let round = Layout::new(Shape::Round, Point::zero());
        assert_eq!(big_key_bounds(&round, 0, 0).top_left, Point::new(18, 0));
        assert_eq!(small_key_bounds(&round, 0, 0).top_left, Point::new(28, 0));
        let rect = Layout::new(Shape::Rect, Point::zero());
        assert_eq!(big_key_bounds(&rect, 0, 8).top_left, Point::new(1 + 8 * 16, 0));
    }
}
