//! PostScript Table
//!
//! Only the 32-byte header is interpreted; the glyph name data of versions
//! 1.0 and 2.0 is not needed by the shaping pipeline.
//!
//! More information on ['post'](https://docs.microsoft.com/en-gb/typography/opentype/spec/post)

use crate::error::Error;
use crate::types::Fixed;
use crate::view::View;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Post {
    version: u32,
    italic_angle: Fixed,
    underline_position: i16,
    underline_thickness: i16,
    is_fixed_pitch: bool,
}

impl Post {
    pub fn parse(data: View) -> Result<Post, Error> {
        let version = data.u32(0)?;
        match version {
            0x0001_0000 | 0x0002_0000 | 0x0002_5000 | 0x0003_0000 => {}
            _ => return Err(Error::unsupported(format!("'post' version {:#x}", version))),
        }

        Ok(Post {
            version,
            italic_angle: data.u32(4)? as i32,
            underline_position: data.i16(8)?,
            underline_thickness: data.i16(10)?,
            is_fixed_pitch: data.u32(12)? != 0,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Italic angle in degrees, counter-clockwise from vertical (16.16).
    pub fn italic_angle(&self) -> Fixed {
        self.italic_angle
    }

    pub fn underline_position(&self) -> i16 {
        self.underline_position
    }

    pub fn underline_thickness(&self) -> i16 {
        self.underline_thickness
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.is_fixed_pitch
    }
}
