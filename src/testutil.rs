//! In-memory font fixtures for tests.
//!
//! Builds a complete minimal font: 12 glyphs, a (3,1) format-4 cmap mapping
//! A-D, e, é and U+0301, metrics for the first four glyphs, a GSUB with a
//! 'case' single substitution (glyph 2 -> 3) and a 'liga' ligature
//! (e + U+0301 -> glyph 8) under a 'latn' script with a 'TRK ' language
//! system, an empty GPOS and a small GDEF.

/// Knobs for the fixture font.
pub struct FontBuilder {
    /// Tables to leave out of the directory.
    pub omit: Vec<[u8; 4]>,
    /// Zero the hhea ascender/descender to exercise the OS/2 fallback.
    pub zero_hhea_extents: bool,
    /// Append an uninterpreted 'zzzz' table.
    pub include_unknown_table: bool,
}

impl Default for FontBuilder {
    fn default() -> FontBuilder {
        FontBuilder {
            omit: Vec::new(),
            zero_hhea_extents: false,
            include_unknown_table: false,
        }
    }
}

pub fn minimal_font() -> Vec<u8> {
    minimal_font_with(|_| {})
}

pub fn minimal_font_with(configure: impl FnOnce(&mut FontBuilder)) -> Vec<u8> {
    let mut builder = FontBuilder::default();
    configure(&mut builder);

    let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
        (*b"GDEF", gdef_table()),
        (*b"GPOS", gpos_table()),
        (*b"GSUB", gsub_table()),
        (*b"OS/2", os2_table()),
        (*b"cmap", cmap_table()),
        (*b"glyf", glyf_table()),
        (*b"head", head_table()),
        (*b"hhea", hhea_table(builder.zero_hhea_extents)),
        (*b"hmtx", hmtx_table()),
        (*b"kern", kern_table()),
        (*b"loca", loca_table()),
        (*b"maxp", maxp_table()),
        (*b"name", name_table()),
        (*b"post", post_table()),
    ];

    if builder.include_unknown_table {
        tables.push((*b"zzzz", vec![0xDE, 0xAD, 0xBE, 0xEF]));
    }
    tables.retain(|(tag, _)| !builder.omit.contains(tag));

    assemble(tables)
}

fn push16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn assemble(mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by(|a, b| a.0.cmp(&b.0));

    let num_tables = tables.len() as u16;
    let mut search_range = 1u16;
    let mut entry_selector = 0u16;
    while search_range * 2 <= num_tables {
        search_range *= 2;
        entry_selector += 1;
    }
    search_range *= 16;
    let range_shift = num_tables * 16 - search_range;

    let mut out = Vec::new();
    push32(&mut out, 0x0001_0000);
    push16(&mut out, num_tables);
    push16(&mut out, search_range);
    push16(&mut out, entry_selector);
    push16(&mut out, range_shift);

    let mut offset = (12 + 16 * tables.len() + 3) & !3;
    for (tag, data) in &tables {
        out.extend_from_slice(tag);
        push32(&mut out, 0); // checksum is not verified at parse time
        push32(&mut out, offset as u32);
        push32(&mut out, data.len() as u32);
        offset += (data.len() + 3) & !3;
    }

    while out.len() % 4 != 0 {
        out.push(0);
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}

fn head_table() -> Vec<u8> {
    let mut out = Vec::new();
    push32(&mut out, 0x0001_0000); // version
    push32(&mut out, 0); // fontRevision
    push32(&mut out, 0); // checkSumAdjustment
    push32(&mut out, 0x5F0F_3CF5); // magicNumber
    push16(&mut out, 0); // flags
    push16(&mut out, 1000); // unitsPerEm
    out.extend_from_slice(&[0; 16]); // created, modified
    out.extend_from_slice(&[0; 8]); // bounding box
    push16(&mut out, 0); // macStyle
    push16(&mut out, 8); // lowestRecPPEM
    out.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
    out.extend_from_slice(&0i16.to_be_bytes()); // indexToLocFormat: short
    out.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
    out
}

fn hhea_table(zero_extents: bool) -> Vec<u8> {
    let (ascender, descender) = if zero_extents { (0, 0) } else { (800i16, -200i16) };
    let mut out = Vec::new();
    push32(&mut out, 0x0001_0000);
    out.extend_from_slice(&ascender.to_be_bytes());
    out.extend_from_slice(&descender.to_be_bytes());
    push16(&mut out, 0); // lineGap
    push16(&mut out, 600); // advanceWidthMax
    out.extend_from_slice(&[0; 22]); // bearings, caret, reserved, format
    push16(&mut out, 4); // numberOfHMetrics
    out
}

fn maxp_table() -> Vec<u8> {
    let mut out = Vec::new();
    push32(&mut out, 0x0000_5000);
    push16(&mut out, 12); // numGlyphs
    out
}

fn hmtx_table() -> Vec<u8> {
    let mut out = Vec::new();
    for (advance, lsb) in [(500u16, 50i16), (600, 60), (550, 55), (400, 40)] {
        push16(&mut out, advance);
        out.extend_from_slice(&lsb.to_be_bytes());
    }
    out.extend_from_slice(&[0; 16]); // trailing lsb array for glyphs 4..11
    out
}

fn loca_table() -> Vec<u8> {
    // short format: glyph 1 occupies glyf bytes [0, 10), all others empty
    let mut out = Vec::new();
    push16(&mut out, 0);
    push16(&mut out, 0);
    for _ in 2..=12 {
        push16(&mut out, 5);
    }
    out
}

fn glyf_table() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1i16.to_be_bytes()); // numberOfContours
    for v in [50i16, 0, 450, 700] {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out
}

fn cmap_table() -> Vec<u8> {
    // format 4, delta-only segments:
    // A-D -> 1-4, e -> 5, é -> 6, U+0301 -> 7
    let segments: [(u16, u16, u16); 5] = [
        (0x41, 0x44, 0xFFC0),
        (0x65, 0x65, 0xFFA0),
        (0xE9, 0xE9, 0xFF1D),
        (0x301, 0x301, 0xFD06),
        (0xFFFF, 0xFFFF, 1),
    ];
    let seg_count = segments.len() as u16;

    let mut subtable = Vec::new();
    push16(&mut subtable, 4);
    push16(&mut subtable, 16 + seg_count * 8);
    push16(&mut subtable, 0); // language
    push16(&mut subtable, seg_count * 2);
    subtable.extend_from_slice(&[0; 6]); // search fields
    for (_, end, _) in &segments {
        push16(&mut subtable, *end);
    }
    push16(&mut subtable, 0); // reservedPad
    for (start, _, _) in &segments {
        push16(&mut subtable, *start);
    }
    for (_, _, delta) in &segments {
        push16(&mut subtable, *delta);
    }
    for _ in &segments {
        push16(&mut subtable, 0); // idRangeOffset
    }

    let mut out = Vec::new();
    push16(&mut out, 0); // version
    push16(&mut out, 1); // numTables
    push16(&mut out, 3); // platform: Windows
    push16(&mut out, 1); // encoding: Unicode BMP
    push32(&mut out, 12);
    out.extend_from_slice(&subtable);
    out
}

fn os2_table() -> Vec<u8> {
    let mut out = vec![0u8; 96];
    out[..2].copy_from_slice(&2u16.to_be_bytes()); // version
    out[4..6].copy_from_slice(&400u16.to_be_bytes()); // usWeightClass
    out[62..64].copy_from_slice(&0x0040u16.to_be_bytes()); // fsSelection: REGULAR
    out[68..70].copy_from_slice(&750i16.to_be_bytes()); // sTypoAscender
    out[70..72].copy_from_slice(&(-250i16).to_be_bytes()); // sTypoDescender
    out[72..74].copy_from_slice(&90i16.to_be_bytes()); // sTypoLineGap
    out[86..88].copy_from_slice(&460i16.to_be_bytes()); // sxHeight
    out[88..90].copy_from_slice(&640i16.to_be_bytes()); // sCapHeight
    out
}

fn post_table() -> Vec<u8> {
    let mut out = Vec::new();
    push32(&mut out, 0x0003_0000);
    out.resize(32, 0);
    out
}

fn name_table() -> Vec<u8> {
    let family: Vec<u8> = "Test"
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes().to_vec())
        .collect();
    let subfamily: Vec<u8> = "Regular"
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes().to_vec())
        .collect();

    let mut out = Vec::new();
    push16(&mut out, 0); // format
    push16(&mut out, 2); // count
    push16(&mut out, 30); // stringOffset
    for (name_id, length, offset) in [
        (1u16, family.len() as u16, 0u16),
        (2, subfamily.len() as u16, family.len() as u16),
    ] {
        push16(&mut out, 3); // platform
        push16(&mut out, 1); // encoding
        push16(&mut out, 0x409); // language
        push16(&mut out, name_id);
        push16(&mut out, length);
        push16(&mut out, offset);
    }
    out.extend_from_slice(&family);
    out.extend_from_slice(&subfamily);
    out
}

fn kern_table() -> Vec<u8> {
    let mut out = Vec::new();
    push16(&mut out, 0); // version
    push16(&mut out, 1); // nTables
    push16(&mut out, 0); // subtable version
    push16(&mut out, 20); // length
    push16(&mut out, 0x0001); // coverage: horizontal, format 0
    push16(&mut out, 1); // nPairs
    out.extend_from_slice(&[0; 6]); // search fields
    push16(&mut out, 1); // left
    push16(&mut out, 2); // right
    out.extend_from_slice(&(-50i16).to_be_bytes());
    out
}

fn gdef_table() -> Vec<u8> {
    let mut out = Vec::new();
    push16(&mut out, 1); // major
    push16(&mut out, 0); // minor
    push16(&mut out, 12); // glyphClassDef
    out.extend_from_slice(&[0; 6]); // attachList, ligCaretList, markAttachClassDef
    // ClassDef format 1: glyphs 5, 6 base; glyph 7 mark
    for v in [1u16, 5, 3, 1, 1, 3] {
        push16(&mut out, v);
    }
    out
}

fn gpos_table() -> Vec<u8> {
    let mut out = Vec::new();
    push16(&mut out, 1);
    push16(&mut out, 0);
    push16(&mut out, 10); // scriptList
    push16(&mut out, 12); // featureList
    push16(&mut out, 14); // lookupList
    push16(&mut out, 0); // empty script list
    push16(&mut out, 0); // empty feature list
    push16(&mut out, 0); // empty lookup list
    out
}

pub fn gsub_table() -> Vec<u8> {
    // script list: 'latn' with a default LangSys [0, 1] and 'TRK ' [0]
    let mut default_lang_sys = Vec::new();
    for v in [0u16, 0xFFFF, 2, 0, 1] {
        push16(&mut default_lang_sys, v);
    }
    let mut trk_lang_sys = Vec::new();
    for v in [0u16, 0xFFFF, 1, 0] {
        push16(&mut trk_lang_sys, v);
    }

    let mut script = Vec::new();
    push16(&mut script, 10); // defaultLangSys at script + 10
    push16(&mut script, 1); // langSysCount
    script.extend_from_slice(b"TRK ");
    push16(&mut script, 10 + default_lang_sys.len() as u16);
    script.extend_from_slice(&default_lang_sys);
    script.extend_from_slice(&trk_lang_sys);

    let mut script_list = Vec::new();
    push16(&mut script_list, 1);
    script_list.extend_from_slice(b"latn");
    push16(&mut script_list, 8); // script record offset
    script_list.extend_from_slice(&script);

    // feature list: 'case' -> lookup 0, 'liga' -> lookup 1
    let mut feature_case = Vec::new();
    for v in [0u16, 1, 0] {
        push16(&mut feature_case, v);
    }
    let mut feature_liga = Vec::new();
    for v in [0u16, 1, 1] {
        push16(&mut feature_liga, v);
    }

    let mut feature_list = Vec::new();
    push16(&mut feature_list, 2);
    feature_list.extend_from_slice(b"case");
    push16(&mut feature_list, 14);
    feature_list.extend_from_slice(b"liga");
    push16(&mut feature_list, 14 + feature_case.len() as u16);
    feature_list.extend_from_slice(&feature_case);
    feature_list.extend_from_slice(&feature_liga);

    // lookup 0: single substitution, coverage [2], delta +1
    let mut single = Vec::new();
    push16(&mut single, 1); // format
    push16(&mut single, 6); // coverage offset
    push16(&mut single, 1); // delta
    for v in [1u16, 1, 2] {
        push16(&mut single, v); // coverage
    }
    let mut lookup0 = Vec::new();
    for v in [1u16, 0, 1, 8] {
        push16(&mut lookup0, v);
    }
    lookup0.extend_from_slice(&single);

    // lookup 1: ligature substitution, e (5) + U+0301 (7) -> glyph 8
    let mut ligature = Vec::new();
    push16(&mut ligature, 1); // format
    push16(&mut ligature, 8); // coverage offset
    push16(&mut ligature, 1); // ligSetCount
    push16(&mut ligature, 14); // ligSet offset
    for v in [1u16, 1, 5] {
        push16(&mut ligature, v); // coverage
    }
    for v in [1u16, 4, 8, 2, 7] {
        push16(&mut ligature, v); // ligature set + ligature
    }
    let mut lookup1 = Vec::new();
    for v in [4u16, 0, 1, 8] {
        push16(&mut lookup1, v);
    }
    lookup1.extend_from_slice(&ligature);

    let mut lookup_list = Vec::new();
    push16(&mut lookup_list, 2);
    push16(&mut lookup_list, 6);
    push16(&mut lookup_list, 6 + lookup0.len() as u16);
    lookup_list.extend_from_slice(&lookup0);
    lookup_list.extend_from_slice(&lookup1);

    let mut out = Vec::new();
    push16(&mut out, 1); // major
    push16(&mut out, 0); // minor
    push16(&mut out, 10);
    push16(&mut out, 10 + script_list.len() as u16);
    push16(&mut out, 10 + (script_list.len() + feature_list.len()) as u16);
    out.extend_from_slice(&script_list);
    out.extend_from_slice(&feature_list);
    out.extend_from_slice(&lookup_list);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_fixture_is_well_formed() {
        let bytes = minimal_font();
        assert_eq!(&bytes[..4], &[0x00, 0x01, 0x00, 0x00]);
        // 14 tables
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 14);
    }
}
