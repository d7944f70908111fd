//! Kerning
//!
//! Only format-0 subtables (sorted kerning pairs) are interpreted; other
//! formats are skipped with a warning. Some shipped fonts carry inconsistent
//! subtable lengths in the header, so the authoritative length of a format-0
//! subtable is derived from its pair count (`nPairs × 6`) and the header
//! value is tolerated.

use log::warn;

use crate::error::Error;
use crate::types::GlyphId;
use crate::view::View;

const SUBTABLE_HEADER_LEN: usize = 6;
const FORMAT0_HEADER_LEN: usize = 14;
const PAIR_LEN: usize = 6;

const COVERAGE_HORIZONTAL: u16 = 0x0001;

#[derive(Debug, Copy, Clone)]
pub struct KernSubtable<'otf> {
    coverage: u16,
    pairs: View<'otf>,
    n_pairs: usize,
}

impl<'otf> KernSubtable<'otf> {
    pub fn n_pairs(&self) -> usize {
        self.n_pairs
    }

    pub fn is_horizontal(&self) -> bool {
        self.coverage & COVERAGE_HORIZONTAL != 0
    }

    /// Kerning adjustment for the pair, by binary search over the sorted
    /// (left << 16 | right) keys.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let key = (u32::from(left) << 16) | u32::from(right);
        let mut lo = 0usize;
        let mut hi = self.n_pairs;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let entry = self.pairs.u32(mid * PAIR_LEN).ok()?;
            if entry < key {
                lo = mid + 1;
            } else if entry > key {
                hi = mid;
            } else {
                return self.pairs.i16(mid * PAIR_LEN + 4).ok();
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct Kern<'otf> {
    subtables: Vec<KernSubtable<'otf>>,
}

impl<'otf> Kern<'otf> {
    pub fn parse(data: View<'otf>) -> Result<Kern<'otf>, Error> {
        let version = data.u16(0)?;
        if version != 0 {
            return Err(Error::unsupported(format!("'kern' version {}", version)));
        }
        let n_tables = data.u16(2)?;

        let mut subtables = Vec::new();
        let mut offset = 4usize;
        for _ in 0..n_tables {
            let header_length = usize::from(data.u16(offset + 2)?);
            let coverage = data.u16(offset + 4)?;
            let format = coverage >> 8;

            if format != 0 {
                warn!("skipping 'kern' subtable format {}", format);
                if header_length <= SUBTABLE_HEADER_LEN {
                    break;
                }
                offset += header_length;
                continue;
            }

            let n_pairs = usize::from(data.u16(offset + 6)?);
            let pairs = data.view(offset + FORMAT0_HEADER_LEN, n_pairs * PAIR_LEN)?;
            subtables.push(KernSubtable {
                coverage,
                pairs,
                n_pairs,
            });

            // nPairs decides where the next subtable starts, not the header
            // length field.
            offset += FORMAT0_HEADER_LEN + n_pairs * PAIR_LEN;
        }

        Ok(Kern { subtables })
    }

    pub fn subtables(&self) -> &[KernSubtable<'otf>] {
        &self.subtables
    }

    /// Summed horizontal kerning adjustment for a glyph pair.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let mut total: Option<i16> = None;
        for subtable in &self.subtables {
            if !subtable.is_horizontal() {
                continue;
            }
            if let Some(value) = subtable.kerning(left, right) {
                total = Some(total.unwrap_or(0).wrapping_add(value));
            }
        }
        total
    }
}
