//! Font Header Table
//!
//! The 'head' table contains global information about the font. The pipeline
//! reads the general flags, the design grid resolution and the 'loca' entry
//! width selector from it.
//!
//! More information on ['head'](https://docs.microsoft.com/en-gb/typography/opentype/spec/head)

use nom::bytes::complete::take;
use nom::combinator::verify;
use nom::number::complete::{be_i16, be_i32, be_i64, be_u16, be_u32};
use nom::IResult;

use crate::error::Error;

const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Head {
    flags: u16,
    units_per_em: u16,
    index_to_loc_format: i16,
}

impl Head {
    pub fn parse(buf: &[u8]) -> Result<Head, Error> {
        Ok(parse_head(buf)
            .map_err(|_| Error::font_format("malformed 'head' table"))?
            .1)
    }

    /// bit 0 - baseline for font at y = 0
    /// bit 1 - left sidebearing point at x = 0
    /// bit 7 - font requires layout for correct linguistic rendering
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Design grid units per em; range 64 to 16384.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// 0 for short 'loca' offsets (Offset16 × 2), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.index_to_loc_format
    }
}

pub fn parse_head(input: &[u8]) -> IResult<&[u8], Head> {
    let (input, _version) = verify(be_u32, |v: &u32| *v == 0x0001_0000)(input)?;
    let (input, _font_revision) = be_i32(input)?;
    let (input, _check_sum_adjustment) = be_u32(input)?;
    let (input, _magic_number) = verify(be_u32, |v: &u32| *v == MAGIC_NUMBER)(input)?;
    let (input, flags) = be_u16(input)?;
    let (input, units_per_em) = be_u16(input)?;
    let (input, _created) = be_i64(input)?;
    let (input, _modified) = be_i64(input)?;
    let (input, _bounding_box) = take(8usize)(input)?;
    let (input, _mac_style) = be_u16(input)?;
    let (input, _lowest_rec_ppem) = be_u16(input)?;
    let (input, _font_direction_hint) = be_i16(input)?;
    let (input, index_to_loc_format) = be_i16(input)?;
    let (input, _glyph_data_format) = be_i16(input)?;

    Ok((
        input,
        Head {
            flags,
            units_per_em,
            index_to_loc_format,
        },
    ))
}
