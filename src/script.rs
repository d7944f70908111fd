//! Script and language system tags
//!
//! OpenType layout keys its script list by 4-byte script tags and its
//! language systems by language tags from the OpenType registries; text
//! comes labelled with ISO 15924 script codes and BCP-47 language tags.
//! The conversions here cover the registry entries the shaping pipeline
//! meets in practice; unknown inputs fall back to `DFLT`.

use crate::types::Tag;

/// The default script / language system tag.
pub const DFLT: Tag = Tag::from_bytes(*b"DFLT");

/// ISO 15924 codes whose OpenType tag is not just the lowercased code.
/// The Indic scripts map to their version-2 shaping tags.
static SCRIPT_EXCEPTIONS: &[(&str, &[u8; 4])] = &[
    ("Beng", b"bng2"),
    ("Deva", b"dev2"),
    ("Gujr", b"gjr2"),
    ("Guru", b"gur2"),
    ("Knda", b"knd2"),
    ("Laoo", b"lao "),
    ("Mlym", b"mlm2"),
    ("Mymr", b"mym2"),
    ("Nkoo", b"nko "),
    ("Orya", b"ory2"),
    ("Taml", b"tml2"),
    ("Telu", b"tel2"),
    ("Vaii", b"vai "),
    ("Yiii", b"yi  "),
];

/// OpenType script tag for an ISO 15924 script code. Codes without a
/// registry exception are lowercased; empty or malformed input answers
/// `DFLT`.
pub fn script_tag_for_script(iso15924: &str) -> Tag {
    if iso15924.len() != 4 || !iso15924.is_ascii() {
        return DFLT;
    }
    for (code, tag) in SCRIPT_EXCEPTIONS {
        if iso15924.eq_ignore_ascii_case(code) {
            return Tag::from_bytes(**tag);
        }
    }
    Tag::new(iso15924.to_ascii_lowercase().as_bytes())
}

/// BCP-47 primary language subtags and their OpenType language system tags.
static LANGUAGES: &[(&str, &[u8; 4])] = &[
    ("af", b"AFK "),
    ("am", b"AMH "),
    ("ar", b"ARA "),
    ("as", b"ASM "),
    ("az", b"AZE "),
    ("be", b"BEL "),
    ("bg", b"BGR "),
    ("bn", b"BEN "),
    ("bo", b"TIB "),
    ("br", b"BRE "),
    ("bs", b"BOS "),
    ("ca", b"CAT "),
    ("cs", b"CSY "),
    ("cy", b"WEL "),
    ("da", b"DAN "),
    ("de", b"DEU "),
    ("el", b"ELL "),
    ("en", b"ENG "),
    ("es", b"ESP "),
    ("et", b"ETI "),
    ("eu", b"EUQ "),
    ("fa", b"FAR "),
    ("fi", b"FIN "),
    ("fo", b"FOS "),
    ("fr", b"FRA "),
    ("ga", b"IRI "),
    ("gl", b"GAL "),
    ("gu", b"GUJ "),
    ("he", b"IWR "),
    ("hi", b"HIN "),
    ("hr", b"HRV "),
    ("hu", b"HUN "),
    ("hy", b"HYE "),
    ("id", b"IND "),
    ("is", b"ISL "),
    ("it", b"ITA "),
    ("ja", b"JAN "),
    ("ka", b"KAT "),
    ("kk", b"KAZ "),
    ("km", b"KHM "),
    ("kn", b"KAN "),
    ("ko", b"KOR "),
    ("ku", b"KUR "),
    ("ky", b"KIR "),
    ("lo", b"LAO "),
    ("lt", b"LTH "),
    ("lv", b"LVI "),
    ("mk", b"MKD "),
    ("ml", b"MAL "),
    ("mn", b"MNG "),
    ("mr", b"MAR "),
    ("ms", b"MLY "),
    ("mt", b"MTS "),
    ("ne", b"NEP "),
    ("nl", b"NLD "),
    ("no", b"NOR "),
    ("or", b"ORI "),
    ("pa", b"PAN "),
    ("pl", b"PLK "),
    ("pt", b"PTG "),
    ("ro", b"ROM "),
    ("ru", b"RUS "),
    ("si", b"SNH "),
    ("sk", b"SKY "),
    ("sl", b"SLV "),
    ("sq", b"SQI "),
    ("sr", b"SRB "),
    ("sv", b"SVE "),
    ("sw", b"SWK "),
    ("ta", b"TAM "),
    ("te", b"TEL "),
    ("th", b"THA "),
    ("tr", b"TRK "),
    ("uk", b"UKR "),
    ("ur", b"URD "),
    ("uz", b"UZB "),
    ("vi", b"VIT "),
    ("zh", b"ZHS "),
];

/// OpenType language system tag for a BCP-47 language tag.
///
/// A bare primary subtag matches with confidence 1.0; the primary subtag of
/// a longer tag (e.g. `tr-Latn-TR`) matches with confidence 0.7. When the
/// best match falls below `min_confidence`, or nothing matches, the answer
/// is `DFLT`.
pub fn language_tag_for_language(bcp47: &str, min_confidence: f32) -> Tag {
    let primary = bcp47.split('-').next().unwrap_or("");
    let exact = primary.len() == bcp47.len();
    let confidence = if exact { 1.0 } else { 0.7 };

    if confidence < min_confidence {
        return DFLT;
    }
    for (code, tag) in LANGUAGES {
        if primary.eq_ignore_ascii_case(code) {
            return Tag::from_bytes(**tag);
        }
    }
    DFLT
}

/// Scripts whose primary normalization form is NFD. Everything else maps
/// composed first. The set carries the version-2 Indic shaping tags, where
/// decomposed sequences are the canonical shaping input.
static DECOMPOSED_SCRIPTS: &[&[u8; 4]] = &[
    b"bng2", b"dev2", b"gjr2", b"gur2", b"knd2", b"mlm2", b"ory2", b"tml2", b"tel2",
];

pub fn prefers_decomposed(script: Tag) -> bool {
    DECOMPOSED_SCRIPTS
        .iter()
        .any(|tag| script == Tag::from_bytes(**tag))
}
