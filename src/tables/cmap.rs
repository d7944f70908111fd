//! Character to Glyph Index Mapping Table
//!
//! The table header lists one subtable per supported character encoding.
//! Selection keeps the widest usable encoding: 2-byte BMP encodings are
//! outranked by 4-byte full-repertoire ones, and only the format
//! combinations the shaping pipeline understands qualify: format 4 for
//! (0,3) and (3,1), format 12 for (0,4), (0,10) and (3,10). Platform
//! encoding (0,10) is a FontForge artifact accepted as equivalent to (0,4).
//!
//! Code points that map to no glyph answer 0 (`.notdef`).
//!
//! More information on ['cmap'](https://docs.microsoft.com/en-gb/typography/opentype/spec/cmap)

use crate::error::Error;
use crate::types::GlyphId;
use crate::view::{GlyphSeq, View};

/// Byte width of the code points covered by a (platform, encoding) pair;
/// 0 for encodings the pipeline does not use.
pub fn encoding_width(platform_id: u16, encoding_id: u16) -> u32 {
    match (platform_id, encoding_id) {
        (0, 3) => 2,
        (0, 4) => 4,
        // FontForge writes (0, 10) for its full-Unicode subtables
        (0, 10) => 4,
        (3, 1) => 2,
        (3, 10) => 4,
        _ => 0,
    }
}

fn supported(platform_id: u16, encoding_id: u16, format: u16) -> bool {
    match (platform_id, encoding_id, format) {
        (0, 3, 4) | (0, 4, 12) | (0, 10, 12) | (3, 1, 4) | (3, 10, 12) => true,
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct Cmap<'otf> {
    platform_id: u16,
    encoding_id: u16,
    subtable: Subtable<'otf>,
}

#[derive(Debug, Clone)]
enum Subtable<'otf> {
    Format4(Format4<'otf>),
    Format12(Format12<'otf>),
}

impl<'otf> Cmap<'otf> {
    /// Walks the encoding records and materializes the runtime form of the
    /// widest supported subtable. Records at equal width keep the first in
    /// directory order, fixed for the font's lifetime.
    pub fn parse(data: View<'otf>) -> Result<Cmap<'otf>, Error> {
        let num_tables = data.u16(2)?;

        let mut best: Option<(u32, u16, u16, u16, usize)> = None;
        for i in 0..usize::from(num_tables) {
            let record = 4 + i * 8;
            let platform_id = data.u16(record)?;
            let encoding_id = data.u16(record + 2)?;
            let offset = data.u32(record + 4)? as usize;

            let width = encoding_width(platform_id, encoding_id);
            if width == 0 {
                continue;
            }
            let format = match data.u16(offset) {
                Ok(format) => format,
                Err(_) => continue,
            };
            if !supported(platform_id, encoding_id, format) {
                continue;
            }
            let better = match best {
                Some((best_width, ..)) => width > best_width,
                None => true,
            };
            if better {
                best = Some((width, platform_id, encoding_id, format, offset));
            }
        }

        let (_, platform_id, encoding_id, format, offset) =
            best.ok_or_else(|| Error::font_format("no usable cmap subtable"))?;

        let subtable_data = data.tail(offset)?;
        let subtable = match format {
            4 => Subtable::Format4(Format4::parse(subtable_data)?),
            12 => Subtable::Format12(Format12::parse(subtable_data)?),
            _ => unreachable!("unsupported formats are filtered above"),
        };

        Ok(Cmap {
            platform_id,
            encoding_id,
            subtable,
        })
    }

    pub fn platform_id(&self) -> u16 {
        self.platform_id
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id
    }

    /// Glyph for a code point; 0 when the font has none.
    pub fn lookup(&self, c: char) -> GlyphId {
        self.lookup_u32(c as u32)
    }

    pub fn lookup_u32(&self, c: u32) -> GlyphId {
        match &self.subtable {
            Subtable::Format4(subtable) => subtable.lookup(c),
            Subtable::Format12(subtable) => subtable.lookup(c),
        }
    }

    /// First code point mapping to `glyph`. Walks every segment and code
    /// point; intended for tests, not for shaping.
    pub fn reverse_lookup(&self, glyph: GlyphId) -> Option<char> {
        if glyph == 0 {
            return None;
        }
        match &self.subtable {
            Subtable::Format4(subtable) => subtable.reverse_lookup(glyph),
            Subtable::Format12(subtable) => subtable.reverse_lookup(glyph),
        }
    }
}

/// Format 4: segmented BMP coverage. The four parallel segment arrays are
/// materialized once at parse time; the glyph-id array stays a view.
#[derive(Debug, Clone)]
struct Format4<'otf> {
    seg_count: usize,
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<u16>,
    id_range_offsets: Vec<u16>,
    glyph_ids: GlyphSeq<'otf>,
}

impl<'otf> Format4<'otf> {
    fn parse(data: View<'otf>) -> Result<Format4<'otf>, Error> {
        let seg_count = usize::from(data.u16(6)?) / 2;
        if seg_count == 0 {
            return Err(Error::font_format("cmap format 4 with no segments"));
        }

        let read_array = |base: usize| -> Result<Vec<u16>, Error> {
            (0..seg_count).map(|i| data.u16(base + i * 2)).collect()
        };

        let end_codes = read_array(14)?;
        let start_codes = read_array(16 + seg_count * 2)?;
        let id_deltas = read_array(16 + seg_count * 4)?;
        let id_range_offsets = read_array(16 + seg_count * 6)?;
        let glyph_ids = data.tail(16 + seg_count * 8)?.glyphs();

        Ok(Format4 {
            seg_count,
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            glyph_ids,
        })
    }

    fn lookup(&self, c: u32) -> GlyphId {
        if c > 0xFFFF {
            return 0;
        }
        let c = c as u16;

        // first segment whose end code is >= c
        let mut lo = 0usize;
        let mut hi = self.seg_count;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.end_codes[mid] < c {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo == self.seg_count || self.start_codes[lo] > c {
            return 0;
        }

        let delta = self.id_deltas[lo];
        let range_offset = self.id_range_offsets[lo];
        if range_offset == 0 {
            return c.wrapping_add(delta);
        }

        // The on-disk offset is relative to its own field position; undo
        // that to index the glyph-id array directly.
        let rel = match usize::from(range_offset).checked_sub((self.seg_count - lo) * 2) {
            Some(rel) => rel,
            None => return 0,
        };
        let index = rel / 2 + usize::from(c - self.start_codes[lo]);
        match self.glyph_ids.get(index) {
            Some(glyph) if glyph != 0 => glyph.wrapping_add(delta),
            _ => 0,
        }
    }

    fn reverse_lookup(&self, glyph: GlyphId) -> Option<char> {
        for i in 0..self.seg_count {
            for c in u32::from(self.start_codes[i])..=u32::from(self.end_codes[i]) {
                if self.lookup(c) == glyph {
                    return std::char::from_u32(c);
                }
            }
        }
        None
    }
}

/// Format 12: sequential groups covering the full Unicode range.
#[derive(Debug, Clone)]
struct Format12<'otf> {
    groups: View<'otf>,
    num_groups: usize,
}

const GROUP_LEN: usize = 12;

impl<'otf> Format12<'otf> {
    fn parse(data: View<'otf>) -> Result<Format12<'otf>, Error> {
        let num_groups = data.u32(12)? as usize;
        let groups = data.view(16, num_groups * GROUP_LEN)?;
        Ok(Format12 { groups, num_groups })
    }

    fn group(&self, i: usize) -> Option<(u32, u32, u32)> {
        let base = i * GROUP_LEN;
        Some((
            self.groups.u32(base).ok()?,
            self.groups.u32(base + 4).ok()?,
            self.groups.u32(base + 8).ok()?,
        ))
    }

    fn lookup(&self, c: u32) -> GlyphId {
        let mut lo = 0usize;
        let mut hi = self.num_groups;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let (start, end, start_glyph) = match self.group(mid) {
                Some(group) => group,
                None => return 0,
            };
            if end < c {
                lo = mid + 1;
            } else if start > c {
                hi = mid;
            } else {
                return start_glyph.wrapping_add(c - start) as GlyphId;
            }
        }
        0
    }

    fn reverse_lookup(&self, glyph: GlyphId) -> Option<char> {
        for i in 0..self.num_groups {
            let (start, end, start_glyph) = self.group(i)?;
            let glyph = u32::from(glyph);
            if glyph >= start_glyph && glyph - start_glyph <= end.wrapping_sub(start) {
                return std::char::from_u32(start.wrapping_add(glyph - start_glyph));
            }
        }
        None
    }
}
