//! Initial glyph mapping
//!
//! Converts Unicode text into the font-appropriate glyph sequence. The
//! primary normalization form is chosen per script; within each grapheme
//! cluster the mapper searches for the best representation the font's glyph
//! repertoire allows, merging combining sequences into composed code points
//! where the font has them and falling back to a nucleus-plus-marks
//! decomposition otherwise.

use log::warn;
use unicode_normalization::char::{canonical_combining_class, compose, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

use crate::error::Error;
use crate::font::Font;
use crate::script;
use crate::tables::cmap::Cmap;
use crate::tables::hmtx::Hmtx;
use crate::types::{GlyphId, Tag, NOTDEF};

/// One slot of the shaped buffer: a glyph and its horizontal advance in
/// font design units.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShapedGlyph {
    pub glyph: GlyphId,
    pub advance: u16,
}

/// An ordered sequence of (glyph, advance) pairs. The mapper writes it;
/// feature application rewrites it in place.
#[derive(Debug, Clone, Default)]
pub struct GlyphBuffer {
    glyphs: Vec<ShapedGlyph>,
}

impl GlyphBuffer {
    pub fn new() -> GlyphBuffer {
        GlyphBuffer { glyphs: Vec::new() }
    }

    /// Buffer seeded from glyph ids, advances taken from the font.
    pub fn from_glyphs(glyphs: &[GlyphId], hmtx: &Hmtx) -> GlyphBuffer {
        let mut buffer = GlyphBuffer::new();
        for &glyph in glyphs {
            buffer.push(glyph, hmtx.advance(glyph));
        }
        buffer
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&ShapedGlyph> {
        self.glyphs.get(i)
    }

    pub fn glyph(&self, i: usize) -> Option<GlyphId> {
        self.glyphs.get(i).map(|g| g.glyph)
    }

    pub fn glyph_ids(&self) -> Vec<GlyphId> {
        self.glyphs.iter().map(|g| g.glyph).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapedGlyph> {
        self.glyphs.iter()
    }

    pub fn push(&mut self, glyph: GlyphId, advance: u16) {
        self.glyphs.push(ShapedGlyph { glyph, advance });
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }

    pub(crate) fn set_glyph(&mut self, i: usize, glyph: GlyphId, hmtx: &Hmtx) {
        if let Some(slot) = self.glyphs.get_mut(i) {
            slot.glyph = glyph;
            slot.advance = hmtx.advance(glyph);
        }
    }

    /// Replaces `[start, end)` with `replacement`, preserving relative order
    /// and refreshing the advances of the new glyphs.
    pub(crate) fn splice(&mut self, start: usize, end: usize, replacement: &[GlyphId], hmtx: &Hmtx) {
        let end = end.min(self.glyphs.len());
        if start > end {
            return;
        }
        let shaped = replacement
            .iter()
            .map(|&glyph| ShapedGlyph {
                glyph,
                advance: hmtx.advance(glyph),
            })
            .collect::<Vec<_>>();
        self.glyphs.splice(start..end, shaped);
    }

    /// Maps `text` to glyphs for the given script and language system and
    /// appends them to the buffer. Returns the number of glyphs written.
    ///
    /// A single input grapheme cluster always yields a contiguous run in the
    /// buffer; adjacent clusters never share glyph slots.
    pub fn map_glyphs(
        &mut self,
        text: &str,
        font: &Font,
        script: Tag,
        _lang: Tag,
    ) -> Result<usize, Error> {
        let prefer_composed = !script::prefers_decomposed(script);
        let normalized: Vec<char> = if prefer_composed {
            text.chars().nfc().collect()
        } else {
            text.chars().nfd().collect()
        };

        let written_before = self.len();
        let mut start = 0usize;
        for i in 1..=normalized.len() {
            let cluster_ends = i == normalized.len() || canonical_combining_class(normalized[i]) == 0;
            if cluster_ends {
                self.map_cluster(&normalized[start..i], font, prefer_composed);
                start = i;
            }
        }

        Ok(self.len() - written_before)
    }

    fn map_cluster(&mut self, cluster: &[char], font: &Font, prefer_composed: bool) {
        let cmap = font.cmap();
        let hmtx = font.hmtx();

        // Composed single code point with a glyph: no search needed.
        if prefer_composed && cluster.len() == 1 {
            let glyph = cmap.lookup(cluster[0]);
            if glyph != NOTDEF {
                self.push(glyph, hmtx.advance(glyph));
                return;
            }
        }

        let decomposed: Vec<char> = cluster.iter().cloned().nfd().collect();
        let representation = find_representation(cmap, &decomposed, prefer_composed);
        if !representation.is_defined() {
            warn!(
                "no representation for cluster {:?}, emitting .notdef",
                cluster
            );
            self.push(NOTDEF, hmtx.advance(NOTDEF));
            return;
        }

        self.push(
            representation.nucleus_glyph,
            hmtx.advance(representation.nucleus_glyph),
        );
        for mark in representation.marks {
            self.push(mark, hmtx.advance(mark));
        }
    }
}

/// The best rendering the font offers for a decomposed cluster: a nucleus
/// glyph followed by mark glyphs.
#[derive(Debug, Clone)]
struct Representation {
    nucleus: char,
    nucleus_glyph: GlyphId,
    marks: Vec<GlyphId>,
}

impl Representation {
    /// The "no representation" sentinel.
    fn none() -> Representation {
        Representation {
            nucleus: std::char::REPLACEMENT_CHARACTER,
            nucleus_glyph: NOTDEF,
            marks: Vec::new(),
        }
    }

    fn is_defined(&self) -> bool {
        self.nucleus_glyph != NOTDEF
    }
}

fn find_representation(cmap: &Cmap, decomposed: &[char], prefer_composed: bool) -> Representation {
    search(cmap, &Representation::none(), decomposed, prefer_composed)
}

/// Recursive best-representation search. At each code point the search
/// branches into merging it with the nucleus (canonical composition, kept
/// only when the composed code point has a glyph) and appending it as a
/// mark glyph; a branch dies on `.notdef`, on a composition leaving two
/// distinct code points, or on a mark arriving before any nucleus.
fn search(
    cmap: &Cmap,
    rep: &Representation,
    rest: &[char],
    prefer_composed: bool,
) -> Representation {
    let (next, rest) = match rest.split_first() {
        Some((next, rest)) => (*next, rest),
        None => return rep.clone(),
    };

    let merged = if rep.is_defined() {
        match compose(rep.nucleus, next) {
            Some(composed) => {
                let glyph = cmap.lookup(composed);
                if glyph != NOTDEF {
                    let merged_rep = Representation {
                        nucleus: composed,
                        nucleus_glyph: glyph,
                        marks: rep.marks.clone(),
                    };
                    search(cmap, &merged_rep, rest, prefer_composed)
                } else {
                    Representation::none()
                }
            }
            None => Representation::none(),
        }
    } else {
        Representation::none()
    };

    let appended = {
        let glyph = cmap.lookup(next);
        if glyph == NOTDEF {
            Representation::none()
        } else if rep.is_defined() {
            let mut marks = rep.marks.clone();
            marks.push(glyph);
            let appended_rep = Representation {
                nucleus: rep.nucleus,
                nucleus_glyph: rep.nucleus_glyph,
                marks,
            };
            search(cmap, &appended_rep, rest, prefer_composed)
        } else if is_combining_mark(next) {
            Representation::none()
        } else {
            let nucleus_rep = Representation {
                nucleus: next,
                nucleus_glyph: glyph,
                marks: Vec::new(),
            };
            search(cmap, &nucleus_rep, rest, prefer_composed)
        }
    };

    match (merged.is_defined(), appended.is_defined()) {
        (true, true) => {
            if prefer_composed && merged.marks.len() <= appended.marks.len() {
                merged
            } else {
                appended
            }
        }
        (true, false) => merged,
        (false, true) => appended,
        (false, false) => Representation::none(),
    }
}
