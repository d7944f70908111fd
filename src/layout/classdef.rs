//! Glyph class definitions
//!
//! A class definition table partitions glyph ids into numbered classes.
//! Glyphs outside every entry belong to class 0. Format 1 assigns classes to
//! a consecutive glyph range, format 2 to sorted (start, end, class) ranges.

use crate::error::Error;
use crate::nav::FixedArray;
use crate::types::GlyphId;
use crate::view::{GlyphSeq, View};

const RANGE_LEN: usize = 6;

#[derive(Debug, Copy, Clone)]
pub enum ClassDef<'otf> {
    Format1 {
        start_glyph: GlyphId,
        classes: GlyphSeq<'otf>,
    },
    Format2 {
        ranges: FixedArray<'otf>,
    },
}

impl<'otf> ClassDef<'otf> {
    pub fn parse(data: View<'otf>) -> Result<ClassDef<'otf>, Error> {
        let format = data.u16(0)?;
        match format {
            1 => {
                let start_glyph = data.u16(2)?;
                let count = usize::from(data.u16(4)?);
                let classes = data.view(6, count * 2)?.glyphs();
                Ok(ClassDef::Format1 {
                    start_glyph,
                    classes,
                })
            }
            2 => {
                let count = usize::from(data.u16(2)?);
                let ranges = FixedArray::new(data.view(4, count * RANGE_LEN)?, RANGE_LEN, count);
                Ok(ClassDef::Format2 { ranges })
            }
            _ => Err(Error::font_format(format!("class definition format {}", format))),
        }
    }

    /// The class of `glyph`; 0 when no entry covers it.
    pub fn class(&self, glyph: GlyphId) -> u16 {
        match self {
            ClassDef::Format1 {
                start_glyph,
                classes,
            } => {
                if glyph < *start_glyph {
                    return 0;
                }
                classes.get(usize::from(glyph - start_glyph)).unwrap_or(0)
            }
            ClassDef::Format2 { ranges } => {
                for record in ranges.iter() {
                    let start = record.u16(0).unwrap_or(0xFFFF);
                    let end = record.u16(2).unwrap_or(0);
                    if glyph >= start && glyph <= end {
                        return record.u16(4).unwrap_or(0);
                    }
                }
                0
            }
        }
    }
}
