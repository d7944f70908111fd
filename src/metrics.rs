//! Font- and glyph-level metrics
//!
//! Font metrics come from 'head' and 'hhea', falling back to the OS/2
//! typographic values when 'hhea' carries zero ascent and descent. Glyph
//! metrics combine the 'hmtx' record with the 'glyf' bounding box located
//! through 'loca'.

use log::warn;

use crate::error::Error;
use crate::font::Font;
use crate::types::{GlyphId, Rect};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FontMetrics {
    /// Design grid units per em.
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
    pub max_advance: u16,
}

pub fn font_metrics(font: &Font) -> Result<FontMetrics, Error> {
    let hhea = font.hhea();
    let mut ascent = hhea.ascender();
    let mut descent = hhea.descender();

    if ascent == 0 && descent == 0 {
        let os2 = font.os2();
        ascent = os2.s_typo_ascender();
        descent = os2.s_typo_descender();
    }

    Ok(FontMetrics {
        units_per_em: font.head().units_per_em(),
        ascent,
        descent,
        line_gap: hhea.line_gap(),
        max_advance: hhea.advance_width_max(),
    })
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance, in font design units.
    pub advance: u16,
    /// Left side bearing.
    pub lsb: i16,
    /// Outline bounding box; None for glyphs without an outline.
    pub bbox: Option<Rect<i16>>,
    /// Right side bearing; defined when the bounding box is.
    pub rsb: Option<i16>,
}

pub fn glyph_metrics(font: &Font, glyph: GlyphId) -> Result<GlyphMetrics, Error> {
    let num_glyphs = font.maxp().num_glyphs();
    if glyph >= num_glyphs {
        warn!("glyph metrics for {} outside glyph count {}", glyph, num_glyphs);
        return Err(Error::Bounds {
            offset: usize::from(glyph),
            len: usize::from(num_glyphs),
        });
    }

    let (advance, lsb) = font.hmtx().metrics(glyph);

    let bbox = match (font.glyf(), font.loca()) {
        (Some(glyf), Some(loca)) => glyf.bounding_box(loca, glyph),
        _ => None,
    };
    let rsb = bbox.map(|bbox| advance as i16 - (lsb + bbox.dx()));

    Ok(GlyphMetrics {
        advance,
        lsb,
        bbox,
        rsb,
    })
}
