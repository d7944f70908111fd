//! Glyph Data
//!
//! Outline extraction is out of scope; the only reads against 'glyf' are the
//! per-glyph bounding boxes at bytes [2..10] of each glyph record, located
//! through the 'loca' table.

use crate::tables::loca::Loca;
use crate::types::{GlyphId, Rect};
use crate::view::View;

#[derive(Debug, Copy, Clone)]
pub struct Glyf<'otf> {
    data: View<'otf>,
}

impl<'otf> Glyf<'otf> {
    pub fn new(data: View<'otf>) -> Glyf<'otf> {
        Glyf { data }
    }

    /// Bounding box of the glyph's outline; None for empty glyphs.
    pub fn bounding_box(&self, loca: &Loca, glyph: GlyphId) -> Option<Rect<i16>> {
        let (offset, length) = loca.index_to_location(glyph)?;
        if length < 10 {
            return None;
        }
        let record = self.data.view(offset as usize, length as usize).ok()?;

        let x_min = record.i16(2).ok()?;
        let y_min = record.i16(4).ok()?;
        let x_max = record.i16(6).ok()?;
        let y_max = record.i16(8).ok()?;
        Some(Rect::new(x_min, y_min, x_max, y_max))
    }
}
