//! OS/2 and Windows Metrics Table
//!
//! Only the fields the metrics pipeline consumes are surfaced: weight,
//! selection flags and the typographic vertical metrics used as a fallback
//! when 'hhea' carries zeros.
//!
//! More information on ['OS/2'](https://docs.microsoft.com/en-gb/typography/opentype/spec/os2)

use crate::error::Error;
use crate::view::View;

bitflags! {
    /// Font style selection flags (fsSelection).
    pub struct Selection: u16 {
        const ITALIC = 0x0001;
        const UNDERSCORE = 0x0002;
        const NEGATIVE = 0x0004;
        const OUTLINED = 0x0008;
        const STRIKEOUT = 0x0010;
        const BOLD = 0x0020;
        const REGULAR = 0x0040;
        const USE_TYPO_METRICS = 0x0080;
        const WWS = 0x0100;
        const OBLIQUE = 0x0200;
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Os2 {
    version: u16,
    us_weight_class: u16,
    fs_selection: Selection,
    s_typo_ascender: i16,
    s_typo_descender: i16,
    s_typo_line_gap: i16,
    sx_height: Option<i16>,
    s_cap_height: Option<i16>,
}

impl Os2 {
    pub fn parse(data: View) -> Result<Os2, Error> {
        let version = data.u16(0)?;
        let us_weight_class = data.u16(4)?;
        let fs_selection = Selection::from_bits_truncate(data.u16(62)?);
        let s_typo_ascender = data.i16(68)?;
        let s_typo_descender = data.i16(70)?;
        let s_typo_line_gap = data.i16(72)?;

        let (sx_height, s_cap_height) = if version >= 2 {
            (Some(data.i16(86)?), Some(data.i16(88)?))
        } else {
            (None, None)
        };

        Ok(Os2 {
            version,
            us_weight_class,
            fs_selection,
            s_typo_ascender,
            s_typo_descender,
            s_typo_line_gap,
            sx_height,
            s_cap_height,
        })
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    /// Visual weight class, 1-1000.
    pub fn us_weight_class(&self) -> u16 {
        self.us_weight_class
    }

    pub fn fs_selection(&self) -> Selection {
        self.fs_selection
    }

    pub fn s_typo_ascender(&self) -> i16 {
        self.s_typo_ascender
    }

    pub fn s_typo_descender(&self) -> i16 {
        self.s_typo_descender
    }

    pub fn s_typo_line_gap(&self) -> i16 {
        self.s_typo_line_gap
    }

    /// x height in design units; version 2 and later.
    pub fn sx_height(&self) -> Option<i16> {
        self.sx_height
    }

    /// Cap height in design units; version 2 and later.
    pub fn s_cap_height(&self) -> Option<i16> {
        self.s_cap_height
    }
}
