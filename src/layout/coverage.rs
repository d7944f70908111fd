//! Coverage tables
//!
//! A coverage table is a compact set of glyph ids; a covered glyph answers
//! its coverage index, which sibling arrays in the lookup subtable are
//! indexed by. Format 1 is a sorted glyph array (the index is the array
//! position), format 2 a sorted range array carrying a start coverage index
//! per range.

use crate::error::Error;
use crate::nav::FixedArray;
use crate::types::GlyphId;
use crate::view::{GlyphSeq, View};

const RANGE_LEN: usize = 6;

#[derive(Debug, Copy, Clone)]
pub enum Coverage<'otf> {
    Format1 { glyphs: GlyphSeq<'otf> },
    Format2 { ranges: FixedArray<'otf> },
}

impl<'otf> Coverage<'otf> {
    pub fn parse(data: View<'otf>) -> Result<Coverage<'otf>, Error> {
        let format = data.u16(0)?;
        let count = usize::from(data.u16(2)?);
        match format {
            1 => {
                let glyphs = data.view(4, count * 2)?.glyphs();
                Ok(Coverage::Format1 { glyphs })
            }
            2 => {
                let ranges = FixedArray::new(data.view(4, count * RANGE_LEN)?, RANGE_LEN, count);
                Ok(Coverage::Format2 { ranges })
            }
            _ => Err(Error::font_format(format!("coverage format {}", format))),
        }
    }

    /// Coverage index of `glyph`; None when not covered.
    pub fn lookup(&self, glyph: GlyphId) -> Option<u16> {
        match self {
            Coverage::Format1 { glyphs } => glyphs.binary_search(glyph).map(|i| i as u16),
            Coverage::Format2 { ranges } => {
                let mut lo = 0usize;
                let mut hi = ranges.len();
                while lo < hi {
                    let mid = (lo + hi) / 2;
                    let record = ranges.get(mid);
                    let start = record.u16(0).ok()?;
                    let end = record.u16(2).ok()?;
                    if end < glyph {
                        lo = mid + 1;
                    } else if start > glyph {
                        hi = mid;
                    } else {
                        let base_index = record.u16(4).ok()?;
                        return Some(base_index.wrapping_add(glyph - start));
                    }
                }
                None
            }
        }
    }

    pub fn contains(&self, glyph: GlyphId) -> bool {
        self.lookup(glyph).is_some()
    }
}
