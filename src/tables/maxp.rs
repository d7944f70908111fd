//! Maximum Profile Table
//!
//! The 'maxp' table establishes the memory requirements for a font. Version
//! 0.5 (CFF outlines) carries only the glyph count; version 1.0 (TrueType
//! outlines) adds the profile maxima, which the shaping pipeline does not
//! consume.
//!
//! More information on ['maxp'](https://docs.microsoft.com/en-gb/typography/opentype/spec/maxp)

use nom::number::complete::{be_u16, be_u32};
use nom::IResult;

use crate::error::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Maxp {
    num_glyphs: u16,
}

impl Maxp {
    pub fn parse(buf: &[u8]) -> Result<Maxp, Error> {
        Ok(parse_maxp(buf)
            .map_err(|_| Error::font_format("malformed 'maxp' table"))?
            .1)
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }
}

pub fn parse_maxp(input: &[u8]) -> IResult<&[u8], Maxp> {
    let (input, version) = be_u32(input)?;
    if version != 0x0000_5000 && version != 0x0001_0000 {
        return Err(nom::Err::Error((input, nom::error::ErrorKind::Verify)));
    }
    let (input, num_glyphs) = be_u16(input)?;

    Ok((input, Maxp { num_glyphs }))
}
