//! Status icons drawn from primitives, 18×18 each.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Polyline, PrimitiveStyle, Rectangle, Triangle};

use super::{Glyph, GlyphLayer, Layout, BACKGROUND, GLYPH_COLOR};

pub const GLYPH_SIZE: Size = Size::new(18, 18);

/// Bluetooth rune, relative to the icon corner.
const RUNE: [Point; 6] = [
    Point::new(4, 5),
    Point::new(13, 13),
    Point::new(9, 17),
    Point::new(9, 1),
    Point::new(13, 5),
    Point::new(4, 13),
];

/// The four status icons and their visibility. All start hidden.
pub struct GlyphSet {
    layout: Layout,
    hidden: [bool; 4],
}

impl GlyphSet {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            hidden: [true; 4],
        }
    }

    pub fn is_hidden(&self, glyph: Glyph) -> bool {
        self.hidden[glyph.index()]
    }

    /// Panel area covered by `glyph`.
    pub fn bounds(&self, glyph: Glyph) -> Rectangle {
        Rectangle::new(self.layout.glyph_position(glyph), GLYPH_SIZE)
    }
}

impl GlyphLayer for GlyphSet {
    fn set_hidden(&mut self, glyph: Glyph, hidden: bool) {
        self.hidden[glyph.index()] = hidden;
    }

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for glyph in Glyph::ALL {
            if !self.is_hidden(glyph) {
                draw_icon(target, glyph, self.layout.glyph_position(glyph))?;
            }
        }
        Ok(())
    }
}

fn draw_icon<D>(target: &mut D, glyph: Glyph, at: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let fill = PrimitiveStyle::with_fill(GLYPH_COLOR);
    let stroke = PrimitiveStyle::with_stroke(GLYPH_COLOR, 1);
    let p = |x: i32, y: i32| at + Point::new(x, y);

    match glyph {
        Glyph::BluetoothLost => {
            let rune = RUNE.map(|pt| at + pt);
            Polyline::new(&rune).into_styled(stroke).draw(target)?;
        }
        Glyph::Charging => {
            Triangle::new(p(11, 1), p(4, 10), p(10, 10))
                .into_styled(fill)
                .draw(target)?;
            Triangle::new(p(8, 8), p(14, 8), p(7, 17))
                .into_styled(fill)
                .draw(target)?;
        }
        Glyph::QuietTime => {
            // Crescent: full disc with an offset background disc cut out.
            Circle::new(p(2, 2), 14).into_styled(fill).draw(target)?;
            Circle::new(p(6, 1), 11)
                .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
                .draw(target)?;
        }
        Glyph::BatteryLow => {
            Rectangle::new(p(1, 5), Size::new(14, 8))
                .into_styled(stroke)
                .draw(target)?;
            Rectangle::new(p(15, 7), Size::new(2, 4))
                .into_styled(fill)
                .draw(target)?;
            Rectangle::new(p(3, 7), Size::new(3, 4))
                .into_styled(fill)
                .draw(target)?;
        }
    }
    Ok(())
}
