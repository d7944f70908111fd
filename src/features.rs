//! Feature resolution and application
//!
//! Resolves the feature set a font activates for a (script, language)
//! pair, classifies registered feature tags, and applies substitution
//! features to a glyph buffer. Resolution walks the layout tables through
//! the navigation primitives only; feature classification (GSUB vs GPOS)
//! comes from the layout table a feature was found in.

use log::{debug, warn};

use crate::error::Error;
use crate::font::Font;
use crate::layout::gsub::{self, ApplyContext};
use crate::layout::{Feature, LangSys, LayoutKind, LayoutTable, Script, NO_REQUIRED_FEATURE};
use crate::script::DFLT;
use crate::shape::GlyphBuffer;
use crate::types::Tag;

/// Which layout table a registered feature belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FeatureKind {
    Substitution,
    Positioning,
    Either,
}

/// Registry metadata for a feature tag.
#[derive(Debug, Copy, Clone)]
pub struct FeatureInfo {
    pub tag: Tag,
    pub name: &'static str,
    pub kind: FeatureKind,
}

static REGISTERED_FEATURES: &[(&[u8; 4], &str, FeatureKind)] = &[
    (b"aalt", "Access All Alternates", FeatureKind::Substitution),
    (b"abvf", "Above-base Forms", FeatureKind::Substitution),
    (b"abvm", "Above-base Mark Positioning", FeatureKind::Positioning),
    (b"abvs", "Above-base Substitutions", FeatureKind::Substitution),
    (b"akhn", "Akhand", FeatureKind::Substitution),
    (b"blwf", "Below-base Forms", FeatureKind::Substitution),
    (b"blwm", "Below-base Mark Positioning", FeatureKind::Positioning),
    (b"blws", "Below-base Substitutions", FeatureKind::Substitution),
    (b"c2pc", "Petite Capitals From Capitals", FeatureKind::Substitution),
    (b"c2sc", "Small Capitals From Capitals", FeatureKind::Substitution),
    (b"calt", "Contextual Alternates", FeatureKind::Substitution),
    (b"case", "Case-Sensitive Forms", FeatureKind::Either),
    (b"ccmp", "Glyph Composition / Decomposition", FeatureKind::Substitution),
    (b"cjct", "Conjunct Forms", FeatureKind::Substitution),
    (b"clig", "Contextual Ligatures", FeatureKind::Substitution),
    (b"cpsp", "Capital Spacing", FeatureKind::Positioning),
    (b"cswh", "Contextual Swash", FeatureKind::Substitution),
    (b"curs", "Cursive Positioning", FeatureKind::Positioning),
    (b"dist", "Distances", FeatureKind::Positioning),
    (b"dlig", "Discretionary Ligatures", FeatureKind::Substitution),
    (b"dnom", "Denominators", FeatureKind::Substitution),
    (b"fin2", "Terminal Forms #2", FeatureKind::Substitution),
    (b"fin3", "Terminal Forms #3", FeatureKind::Substitution),
    (b"fina", "Terminal Forms", FeatureKind::Substitution),
    (b"frac", "Fractions", FeatureKind::Substitution),
    (b"fwid", "Full Widths", FeatureKind::Either),
    (b"half", "Half Forms", FeatureKind::Substitution),
    (b"haln", "Halant Forms", FeatureKind::Substitution),
    (b"halt", "Alternate Half Widths", FeatureKind::Positioning),
    (b"hist", "Historical Forms", FeatureKind::Substitution),
    (b"hlig", "Historical Ligatures", FeatureKind::Substitution),
    (b"init", "Initial Forms", FeatureKind::Substitution),
    (b"isol", "Isolated Forms", FeatureKind::Substitution),
    (b"ital", "Italics", FeatureKind::Substitution),
    (b"jalt", "Justification Alternates", FeatureKind::Substitution),
    (b"kern", "Kerning", FeatureKind::Positioning),
    (b"liga", "Standard Ligatures", FeatureKind::Substitution),
    (b"lnum", "Lining Figures", FeatureKind::Substitution),
    (b"locl", "Localized Forms", FeatureKind::Substitution),
    (b"mark", "Mark Positioning", FeatureKind::Positioning),
    (b"med2", "Medial Forms #2", FeatureKind::Substitution),
    (b"medi", "Medial Forms", FeatureKind::Substitution),
    (b"mkmk", "Mark to Mark Positioning", FeatureKind::Positioning),
    (b"mset", "Mark Positioning via Substitution", FeatureKind::Substitution),
    (b"nalt", "Alternate Annotation Forms", FeatureKind::Substitution),
    (b"nukt", "Nukta Forms", FeatureKind::Substitution),
    (b"numr", "Numerators", FeatureKind::Substitution),
    (b"onum", "Oldstyle Figures", FeatureKind::Substitution),
    (b"ordn", "Ordinals", FeatureKind::Substitution),
    (b"ornm", "Ornaments", FeatureKind::Substitution),
    (b"palt", "Proportional Alternate Widths", FeatureKind::Positioning),
    (b"pcap", "Petite Capitals", FeatureKind::Substitution),
    (b"pnum", "Proportional Figures", FeatureKind::Substitution),
    (b"pref", "Pre-base Forms", FeatureKind::Substitution),
    (b"pres", "Pre-base Substitutions", FeatureKind::Substitution),
    (b"pstf", "Post-base Forms", FeatureKind::Substitution),
    (b"psts", "Post-base Substitutions", FeatureKind::Substitution),
    (b"rclt", "Required Contextual Alternates", FeatureKind::Substitution),
    (b"rkrf", "Rakar Forms", FeatureKind::Substitution),
    (b"rlig", "Required Ligatures", FeatureKind::Substitution),
    (b"rphf", "Reph Form", FeatureKind::Substitution),
    (b"rvrn", "Required Variation Alternates", FeatureKind::Substitution),
    (b"salt", "Stylistic Alternates", FeatureKind::Substitution),
    (b"sinf", "Scientific Inferiors", FeatureKind::Substitution),
    (b"smcp", "Small Capitals", FeatureKind::Substitution),
    (b"subs", "Subscript", FeatureKind::Substitution),
    (b"sups", "Superscript", FeatureKind::Substitution),
    (b"swsh", "Swash", FeatureKind::Substitution),
    (b"titl", "Titling", FeatureKind::Substitution),
    (b"tnum", "Tabular Figures", FeatureKind::Substitution),
    (b"unic", "Unicase", FeatureKind::Substitution),
    (b"vert", "Vertical Writing", FeatureKind::Substitution),
    (b"vkrn", "Vertical Kerning", FeatureKind::Positioning),
    (b"vrt2", "Vertical Alternates and Rotation", FeatureKind::Substitution),
    (b"zero", "Slashed Zero", FeatureKind::Substitution),
];

/// Registry metadata for `tag`; `cv00`-`cv99` and `ss01`-`ss20` are
/// recognized by prefix.
pub fn feature_info(tag: Tag) -> Option<FeatureInfo> {
    let bytes = tag.as_bytes();

    let two_digits = |a: u8, b: u8| -> Option<u32> {
        if a.is_ascii_digit() && b.is_ascii_digit() {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        } else {
            None
        }
    };

    if bytes[0] == b'c' && bytes[1] == b'v' {
        if two_digits(bytes[2], bytes[3]).is_some() {
            return Some(FeatureInfo {
                tag,
                name: "Character Variant",
                kind: FeatureKind::Substitution,
            });
        }
    }
    if bytes[0] == b's' && bytes[1] == b's' {
        if let Some(n) = two_digits(bytes[2], bytes[3]) {
            if (1..=20).contains(&n) {
                return Some(FeatureInfo {
                    tag,
                    name: "Stylistic Set",
                    kind: FeatureKind::Substitution,
                });
            }
        }
    }

    REGISTERED_FEATURES
        .iter()
        .find(|(registered, _, _)| tag == **registered)
        .map(|(_, name, kind)| FeatureInfo {
            tag,
            name: *name,
            kind: *kind,
        })
}

/// Features a layout table activates for (script, language): slot 0 carries
/// the mandatory feature (None when the LangSys declares none), the rest
/// follow the LangSys order. Missing script falls back to `DFLT`; an
/// unknown language uses the default language system.
fn features_for<'otf>(
    layout: &LayoutTable<'otf>,
    script_tag: Tag,
    lang_tag: Tag,
) -> Vec<Option<Feature<'otf>>> {
    let scripts = layout.scripts();
    let map = match scripts.as_map() {
        Some(map) => map,
        None => return Vec::new(),
    };

    let mut link = map.lookup_tag(script_tag);
    if link.is_null() && script_tag != DFLT {
        link = map.lookup_tag(DFLT);
    }
    if link.is_null() {
        return Vec::new();
    }
    let script = Script::new(link.jump());

    let mut lang_sys_link = script.default_lang_sys();
    if lang_tag != DFLT {
        let tagged = script.lang_sys_map().lookup_tag(lang_tag);
        if !tagged.is_null() {
            lang_sys_link = tagged;
        }
    }
    if lang_sys_link.is_null() {
        return Vec::new();
    }
    let lang_sys = LangSys::new(lang_sys_link.jump());

    lang_sys
        .list()
        .into_iter()
        .map(|index| {
            if index == NO_REQUIRED_FEATURE {
                None
            } else {
                layout.feature_by_index(index)
            }
        })
        .collect()
}

/// The GSUB and GPOS feature sets for (script, language).
pub fn font_features<'otf>(
    font: &Font<'otf>,
    script: Tag,
    lang: Tag,
) -> Result<(Vec<Option<Feature<'otf>>>, Vec<Option<Feature<'otf>>>), Error> {
    let gsub = features_for(font.gsub(), script, lang);
    let gpos = features_for(font.gpos(), script, lang);
    Ok((gsub, gpos))
}

/// Whether the font's substitution tables cover (script, language);
/// answers the script and language tags actually matched.
pub fn font_supports_script(font: &Font, script: Tag, lang: Tag) -> Option<(Tag, Tag)> {
    let map = font.gsub().script_list();

    let mut found_script = script;
    let mut link = map.lookup_tag(script);
    if link.is_null() && script != DFLT {
        link = map.lookup_tag(DFLT);
        found_script = DFLT;
    }
    if link.is_null() {
        return None;
    }
    let script_table = Script::new(link.jump());

    if lang != DFLT && !script_table.lang_sys_map().lookup_tag(lang).is_null() {
        return Some((found_script, lang));
    }
    if script_table.default_lang_sys().is_null() {
        return None;
    }
    Some((found_script, DFLT))
}

/// Applies one feature to the buffer at `pos`.
///
/// The feature's lookups run in declared order; within each lookup the
/// first matching subtable is the only one applied, and `pos` advances by
/// its reported delta. Returns the new position and whether any lookup
/// applied. Out-of-range positions are a logged no-op.
pub fn apply_feature(
    font: &Font,
    feature: &Feature,
    buffer: &mut GlyphBuffer,
    pos: usize,
    alt: i32,
) -> (usize, bool) {
    if pos >= buffer.len() {
        warn!(
            "apply_feature '{}': position {} outside buffer of {} glyphs",
            feature.tag(),
            pos,
            buffer.len()
        );
        return (pos, false);
    }

    let layout = match feature.kind() {
        LayoutKind::Gsub => font.gsub(),
        LayoutKind::Gpos => {
            debug!(
                "positioning feature '{}' not applied: GPOS application is out of scope",
                feature.tag()
            );
            return (pos, false);
        }
    };

    let ctx = ApplyContext {
        layout,
        hmtx: font.hmtx(),
    };

    let mut pos = pos;
    let mut applied = false;
    for index in feature.lookup_indices() {
        let result = gsub::apply_lookup(&ctx, index, buffer, pos, alt, 0);
        if result.applied {
            applied = true;
            pos += result.advance;
        }
    }
    (pos, applied)
}
