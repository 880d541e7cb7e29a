//! User interface - piano rows and status glyphs.
//!
//! Everything here draws through `embedded_graphics::DrawTarget`, so the
//! same code renders to the ST7789 panel on the watch and to an in-memory
//! frame buffer in host tests.
//!
//! ## Face layout (144×168, offset by [`Layout::origin`])
//!
//! - **Hour row**: 9 big keys + 7 small keys at y = 28
//! - **Minute row**: same, at y = 100
//! - **Glyphs**: four 18×18 icons along the top (rectangular) or the
//!   top and bottom edges (round)

pub mod glyphs;
pub mod piano;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
pub const KEY_WHITE: Rgb565 = Rgb565::WHITE;
pub const KEY_BLACK: Rgb565 = Rgb565::BLACK;
/// Light grey (0xAAAAAA) marking a lit key.
pub const KEY_LIT: Rgb565 = Rgb565::new(21, 42, 21);
pub const GLYPH_COLOR: Rgb565 = Rgb565::WHITE;

/// Panel outline; selects key and glyph origins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    Rect,
    Round,
}

/// Status icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Shown while the phone is disconnected.
    BluetoothLost,
    Charging,
    QuietTime,
    BatteryLow,
}

impl Glyph {
    pub const ALL: [Glyph; 4] = [
        Glyph::BluetoothLost,
        Glyph::Charging,
        Glyph::QuietTime,
        Glyph::BatteryLow,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Visibility-controlled status icons, drawn over the keyboard.
pub trait GlyphLayer {
    fn set_hidden(&mut self, glyph: Glyph, hidden: bool);

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// Placement of the face on the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub shape: Shape,
    /// Panel coordinate of the face's top-left corner.
    pub origin: Point,
}

impl Layout {
    pub const fn new(shape: Shape, origin: Point) -> Self {
        Self { shape, origin }
    }

    /// Left edge of big key 0, relative to the face.
    pub const fn big_key_x(&self) -> i32 {
        match self.shape {
            Shape::Rect => 1,
            Shape::Round => 18,
        }
    }

    /// Left edge of small slot 0, relative to the face.
    pub const fn small_key_x(&self) -> i32 {
        match self.shape {
            Shape::Rect => 12,
            Shape::Round => 28,
        }
    }

    /// Panel coordinate of a glyph's top-left corner.
    pub fn glyph_position(&self, glyph: Glyph) -> Point {
        let (x, y) = match (self.shape, glyph) {
            (Shape::Rect, Glyph::BluetoothLost) => (0, 4),
            (Shape::Rect, Glyph::QuietTime) => (12, 2),
            (Shape::Rect, Glyph::Charging) => (120, 4),
            (Shape::Rect, Glyph::BatteryLow) => (104, 4),
            (Shape::Round, Glyph::BluetoothLost) => (68, 8),
            (Shape::Round, Glyph::QuietTime) => (80, 4),
            (Shape::Round, Glyph::Charging) => (80, 160),
            (Shape::Round, Glyph::BatteryLow) => (66, 160),
        };
        self.origin + Point::new(x, y)
    }
}

#[cfg(test)]
pub(crate) mod test_target {
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    pub const SIZE: usize = 240;

    /// In-memory 240×240 panel.
    pub struct FrameBuffer {
        pixels: [[Rgb565; SIZE]; SIZE],
    }

    impl FrameBuffer {
        pub fn new(fill: Rgb565) -> Self {
            Self {
                pixels: [[fill; SIZE]; SIZE],
            }
        }

        pub fn pixel(&self, p: Point) -> Rgb565 {
            self.pixels[p.y as usize][p.x as usize]
        }

        /// Count pixels of `color` inside `area`.
        pub fn count(&self, area: embedded_graphics::primitives::Rectangle, color: Rgb565) -> usize {
            area.points().filter(|&p| self.pixel(p) == color).count()
        }
    }

    impl OriginDimensions for FrameBuffer {
        fn size(&self) -> Size {
            Size::new(SIZE as u32, SIZE as u32)
        }
    }

    impl DrawTarget for FrameBuffer {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, color) in pixels {
                if (0..SIZE as i32).contains(&p.x) && (0..SIZE as i32).contains(&p.y) {
                    self.pixels[p.y as usize][p.x as usize] = color;
                }
            }
            Ok(())
        }
    }
}
