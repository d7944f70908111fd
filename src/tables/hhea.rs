//! Horizontal Header Table
//!
//! The 'hhea' table holds the font-wide horizontal layout values and the
//! number of full records in the 'hmtx' table.
//!
//! More information on ['hhea'](https://docs.microsoft.com/en-gb/typography/opentype/spec/hhea)

use nom::bytes::complete::take;
use nom::combinator::verify;
use nom::number::complete::{be_i16, be_u16, be_u32};
use nom::IResult;

use crate::error::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Hhea {
    ascender: i16,
    descender: i16,
    line_gap: i16,
    advance_width_max: u16,
    number_of_h_metrics: u16,
}

impl Hhea {
    pub fn parse(buf: &[u8]) -> Result<Hhea, Error> {
        Ok(parse_hhea(buf)
            .map_err(|_| Error::font_format("malformed 'hhea' table"))?
            .1)
    }

    /// Typographic ascent, in font design units.
    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    /// Typographic descent, in font design units (negative below baseline).
    pub fn descender(&self) -> i16 {
        self.descender
    }

    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    /// Maximum advance width in the 'hmtx' table.
    pub fn advance_width_max(&self) -> u16 {
        self.advance_width_max
    }

    /// Number of full (advance, lsb) records in the 'hmtx' table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }
}

pub fn parse_hhea(input: &[u8]) -> IResult<&[u8], Hhea> {
    let (input, _version) = verify(be_u32, |v: &u32| *v == 0x0001_0000)(input)?;
    let (input, ascender) = be_i16(input)?;
    let (input, descender) = be_i16(input)?;
    let (input, line_gap) = be_i16(input)?;
    let (input, advance_width_max) = be_u16(input)?;
    let (input, _min_left_side_bearing) = be_i16(input)?;
    let (input, _min_right_side_bearing) = be_i16(input)?;
    let (input, _x_max_extent) = be_i16(input)?;
    let (input, _caret) = take(6usize)(input)?;
    let (input, _reserved) = take(8usize)(input)?;
    let (input, _metric_data_format) = be_i16(input)?;
    let (input, number_of_h_metrics) = be_u16(input)?;

    Ok((
        input,
        Hhea {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            number_of_h_metrics,
        },
    ))
}
