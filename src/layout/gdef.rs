//! Glyph Definition Table
//!
//! GDEF classifies glyphs for lookup filtering: the glyph class definition
//! (base / ligature / mark / component), the mark attachment classes and the
//! mark glyph sets. The ligature caret list is carried as an uninterpreted
//! link. Header versions 1.0, 1.2 and 1.3 differ only in trailing fields;
//! the header size is recorded.
//!
//! More information on ['GDEF'](https://docs.microsoft.com/en-gb/typography/opentype/spec/gdef)

use crate::error::Error;
use crate::layout::classdef::ClassDef;
use crate::layout::coverage::Coverage;
use crate::nav::Link;
use crate::types::GlyphId;
use crate::view::View;

/// The four glyph classes of the glyph class definition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GlyphClass {
    Unclassified,
    Base,
    Ligature,
    Mark,
    Component,
}

impl GlyphClass {
    fn from_class(class: u16) -> GlyphClass {
        match class {
            1 => GlyphClass::Base,
            2 => GlyphClass::Ligature,
            3 => GlyphClass::Mark,
            4 => GlyphClass::Component,
            _ => GlyphClass::Unclassified,
        }
    }
}

#[derive(Debug)]
pub struct Gdef<'otf> {
    header_size: usize,
    glyph_class_def: Option<ClassDef<'otf>>,
    attach_list: Link<'otf>,
    lig_caret_list: Link<'otf>,
    mark_attach_class_def: Option<ClassDef<'otf>>,
    mark_glyph_sets: Vec<Coverage<'otf>>,
}

impl<'otf> Gdef<'otf> {
    pub fn parse(data: View<'otf>) -> Result<Gdef<'otf>, Error> {
        let major = data.u16(0)?;
        let minor = data.u16(2)?;
        let header_size = match (major, minor) {
            (1, 0) => 12,
            (1, 2) => 14,
            (1, 3) => 18,
            _ => {
                return Err(Error::unsupported(format!(
                    "GDEF version {}.{}",
                    major, minor
                )));
            }
        };

        let class_def_at = |offset: usize| -> Option<ClassDef<'otf>> {
            let offset = data.u16(offset).map(usize::from).unwrap_or(0);
            if offset == 0 {
                return None;
            }
            data.tail(offset).ok().and_then(|d| ClassDef::parse(d).ok())
        };

        let glyph_class_def = class_def_at(4);
        let attach_list = Link::named(data, data.u16(6).map(usize::from).unwrap_or(0), "AttachList");
        let lig_caret_list = Link::named(
            data,
            data.u16(8).map(usize::from).unwrap_or(0),
            "LigCaretList",
        );
        let mark_attach_class_def = class_def_at(10);

        let mut mark_glyph_sets = Vec::new();
        if header_size >= 14 {
            let sets_offset = data.u16(12).map(usize::from).unwrap_or(0);
            if sets_offset != 0 {
                let sets = data.tail(sets_offset)?;
                let count = usize::from(sets.u16(2)?);
                for i in 0..count {
                    let offset = sets.u32(4 + i * 4)? as usize;
                    if offset == 0 {
                        continue;
                    }
                    mark_glyph_sets.push(Coverage::parse(sets.tail(offset)?)?);
                }
            }
        }

        Ok(Gdef {
            header_size,
            glyph_class_def,
            attach_list,
            lig_caret_list,
            mark_attach_class_def,
            mark_glyph_sets,
        })
    }

    pub fn header_size(&self) -> usize {
        self.header_size
    }

    pub fn glyph_class_def(&self) -> Option<&ClassDef<'otf>> {
        self.glyph_class_def.as_ref()
    }

    /// Class of `glyph` per the glyph class definition; Unclassified when
    /// the table carries none.
    pub fn glyph_class(&self, glyph: GlyphId) -> GlyphClass {
        match &self.glyph_class_def {
            Some(class_def) => GlyphClass::from_class(class_def.class(glyph)),
            None => GlyphClass::Unclassified,
        }
    }

    /// Mark attachment class of `glyph`; 0 when undefined.
    pub fn mark_attach_class(&self, glyph: GlyphId) -> u16 {
        self.mark_attach_class_def
            .as_ref()
            .map(|class_def| class_def.class(glyph))
            .unwrap_or(0)
    }

    pub fn attach_list(&self) -> Link<'otf> {
        self.attach_list
    }

    /// Not interpreted; callers that render carets parse it themselves.
    pub fn lig_caret_list(&self) -> Link<'otf> {
        self.lig_caret_list
    }

    pub fn mark_glyph_sets(&self) -> &[Coverage<'otf>] {
        &self.mark_glyph_sets
    }

    /// Whether `glyph` belongs to mark glyph set `set_index`.
    pub fn mark_glyph_set_covers(&self, set_index: u16, glyph: GlyphId) -> bool {
        self.mark_glyph_sets
            .get(usize::from(set_index))
            .map(|coverage| coverage.contains(glyph))
            .unwrap_or(false)
    }
}
