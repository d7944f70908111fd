//! Index to Location
//!
//! The 'loca' table stores the offset of every glyph's record in the 'glyf'
//! table, with one extra entry so the length of the last glyph can be
//! computed. A glyph with `loca[n] == loca[n + 1]` has no outline. The entry
//! width is selected by `head.indexToLocFormat`, the entry count by
//! `maxp.numGlyphs`.

use crate::error::Error;
use crate::types::GlyphId;
use crate::view::View;

#[derive(Debug, Copy, Clone)]
pub struct Loca<'otf> {
    data: View<'otf>,
    long_format: bool,
    num_glyphs: u16,
}

impl<'otf> Loca<'otf> {
    pub fn parse(
        data: View<'otf>,
        index_to_loc_format: i16,
        num_glyphs: u16,
    ) -> Result<Loca<'otf>, Error> {
        let long_format = match index_to_loc_format {
            0 => false,
            1 => true,
            _ => {
                return Err(Error::unsupported(format!(
                    "'loca' entry format {}",
                    index_to_loc_format
                )));
            }
        };

        let entry_width = if long_format { 4 } else { 2 };
        let required = (usize::from(num_glyphs) + 1) * entry_width;
        if data.len() < required {
            return Err(Error::font_format(
                "'loca' entry count disagrees with glyph count",
            ));
        }

        Ok(Loca {
            data,
            long_format,
            num_glyphs,
        })
    }

    pub fn entry_width(&self) -> usize {
        if self.long_format {
            4
        } else {
            2
        }
    }

    fn entry(&self, index: usize) -> Option<u32> {
        if self.long_format {
            self.data.u32(index * 4).ok()
        } else {
            // Short entries store the offset divided by two.
            self.data.u16(index * 2).ok().map(|v| u32::from(v) * 2)
        }
    }

    /// Byte range of the glyph's record in the 'glyf' table; None for glyphs
    /// out of range or without an outline.
    pub fn index_to_location(&self, glyph: GlyphId) -> Option<(u32, u32)> {
        if glyph >= self.num_glyphs {
            return None;
        }
        let start = self.entry(usize::from(glyph))?;
        let end = self.entry(usize::from(glyph) + 1)?;
        if end <= start {
            return None;
        }
        Some((start, end - start))
    }
}
