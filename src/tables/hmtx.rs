//! Horizontal Metrics Table
//!
//! The 'hmtx' table gives the advance width and left side bearing of every
//! glyph, indexed by glyph id. As an optimization the number of full 4-byte
//! records may be less than the glyph count, in which case the advance width
//! of the last record applies to all remaining glyphs and their left side
//! bearings follow in a trailing 2-byte array. This is useful in monospaced
//! fonts, or in fonts with a large run of equal-width glyphs at the end of
//! the glyph order.
//!
//! The advance width is always obtained from this table, whichever outline
//! format the font uses. The right side bearing is never stored; it is
//! derived from the advance width, the left side bearing and the glyph's
//! bounding box:
//!
//! > rsb = aw - (lsb + xMax - xMin)
//!
//! The number of full records comes from the numberOfHMetrics field of the
//! 'hhea' table, the total glyph count from the numGlyphs field of 'maxp';
//! the cross-table consistency pass checks the table length against both.
//!
//! More information on ['hmtx'](https://docs.microsoft.com/en-gb/typography/opentype/spec/hmtx)

use crate::error::Error;
use crate::types::GlyphId;
use crate::view::View;

#[derive(Debug, Copy, Clone)]
pub struct Hmtx<'otf> {
    data: View<'otf>,
    number_of_h_metrics: u16,
    num_glyphs: u16,
}

impl<'otf> Hmtx<'otf> {
    /// Builds the view, checking the table covers `number_of_h_metrics` full
    /// records plus the trailing left-side-bearing array.
    ///
    /// * `number_of_h_metrics` comes from the 'hhea' table.
    /// * `num_glyphs` comes from the 'maxp' table.
    pub fn parse(
        data: View<'otf>,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Hmtx<'otf>, Error> {
        if number_of_h_metrics == 0 || number_of_h_metrics > num_glyphs {
            return Err(Error::font_format(
                "'hmtx' metric count disagrees with glyph count",
            ));
        }

        let required = usize::from(number_of_h_metrics) * 4
            + usize::from(num_glyphs - number_of_h_metrics) * 2;
        if data.len() < required {
            return Err(Error::font_format("'hmtx' table too short"));
        }

        Ok(Hmtx {
            data,
            number_of_h_metrics,
            num_glyphs,
        })
    }

    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }

    /// Advance width of `glyph`, in font design units. Glyphs past the full
    /// records reuse the last record's advance; glyphs past the glyph count
    /// answer 0.
    pub fn advance(&self, glyph: GlyphId) -> u16 {
        if glyph >= self.num_glyphs {
            return 0;
        }
        let index = glyph.min(self.number_of_h_metrics - 1);
        self.data.u16(usize::from(index) * 4).unwrap_or(0)
    }

    /// Left side bearing of `glyph`, in font design units.
    pub fn lsb(&self, glyph: GlyphId) -> i16 {
        if glyph >= self.num_glyphs {
            return 0;
        }
        if glyph < self.number_of_h_metrics {
            self.data.i16(usize::from(glyph) * 4 + 2).unwrap_or(0)
        } else {
            let base = usize::from(self.number_of_h_metrics) * 4;
            let index = usize::from(glyph - self.number_of_h_metrics);
            self.data.i16(base + index * 2).unwrap_or(0)
        }
    }

    pub fn metrics(&self, glyph: GlyphId) -> (u16, i16) {
        (self.advance(glyph), self.lsb(glyph))
    }
}
