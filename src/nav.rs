//! Navigation primitives over the table graph.
//!
//! OpenType tables form a DAG of offset-linked records. The types here cover
//! the four traversal shapes the layout tables use (links, fixed-size record
//! arrays, nested variable-offset arrays and tag-keyed record maps) so table
//! code never writes per-table offset arithmetic. A link carries the region
//! its offset resolves against (its base) separately from the record it
//! currently designates.

use crate::types::Tag;
use crate::view::View;

/// An offset relative to a base region. Offset 0 denotes the null link;
/// callers must check [`Link::is_null`] before dereferencing.
#[derive(Debug, Copy, Clone)]
pub struct Link<'otf> {
    base: View<'otf>,
    offset: usize,
    name: &'static str,
}

impl<'otf> Link<'otf> {
    pub fn new(base: View<'otf>, offset: usize) -> Link<'otf> {
        Link {
            base,
            offset,
            name: "",
        }
    }

    pub fn named(base: View<'otf>, offset: usize, name: &'static str) -> Link<'otf> {
        Link { base, offset, name }
    }

    pub fn null(base: View<'otf>) -> Link<'otf> {
        Link::new(base, 0)
    }

    pub fn is_null(&self) -> bool {
        self.offset == 0
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The region starting at `base + offset`. Empty for a null or
    /// out-of-range link.
    pub fn jump(&self) -> View<'otf> {
        if self.is_null() {
            return View::default();
        }
        self.base.tail(self.offset).unwrap_or_default()
    }
}

/// `length` records of `record_size` bytes each. Out-of-range access returns
/// an empty view rather than failing.
#[derive(Debug, Copy, Clone)]
pub struct FixedArray<'otf> {
    data: View<'otf>,
    record_size: usize,
    len: usize,
}

impl<'otf> FixedArray<'otf> {
    pub fn new(data: View<'otf>, record_size: usize, len: usize) -> FixedArray<'otf> {
        FixedArray {
            data,
            record_size,
            len,
        }
    }

    pub fn empty() -> FixedArray<'otf> {
        FixedArray {
            data: View::default(),
            record_size: 1,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    pub fn get(&self, i: usize) -> View<'otf> {
        if i >= self.len {
            return View::default();
        }
        self.data
            .view(i * self.record_size, self.record_size)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = View<'otf>> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

/// `N` parallel 16-bit offsets into sibling records whose records may
/// themselves be offset tables, to `indirections` depth.
///
/// `get(i, deep)` resolves entry `i`; with `deep` it walks the remaining
/// indirection levels (taking the first offset at each) down to the final
/// record's raw bytes. A zero intermediate offset terminates to an empty
/// location. [`VarArray::nested`] exposes one record as the next-level array
/// for callers that need to iterate a deeper level themselves.
#[derive(Debug, Copy, Clone)]
pub struct VarArray<'otf> {
    base: View<'otf>,
    offsets_at: usize,
    len: usize,
    indirections: usize,
}

impl<'otf> VarArray<'otf> {
    pub fn new(
        base: View<'otf>,
        offsets_at: usize,
        len: usize,
        indirections: usize,
    ) -> VarArray<'otf> {
        VarArray {
            base,
            offsets_at,
            len,
            indirections,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn indirections(&self) -> usize {
        self.indirections
    }

    /// The link for entry `i` (null when out of range).
    pub fn link(&self, i: usize) -> Link<'otf> {
        if i >= self.len {
            return Link::null(self.base);
        }
        let offset = self
            .base
            .u16(self.offsets_at + i * 2)
            .map(usize::from)
            .unwrap_or(0);
        Link::new(self.base, offset)
    }

    pub fn get(&self, i: usize, deep: bool) -> View<'otf> {
        let mut record = self.link(i).jump();
        if !deep {
            return record;
        }
        let mut remaining = self.indirections;
        while remaining > 1 && !record.is_empty() {
            // Deeper levels start with a u16 count followed by offsets;
            // the chain follows the first entry.
            let offset = record.u16(2).map(usize::from).unwrap_or(0);
            if offset == 0 {
                return View::default();
            }
            record = record.tail(offset).unwrap_or_default();
            remaining -= 1;
        }
        record
    }

    /// Record `i` reinterpreted as the next indirection level
    /// (u16 count at offset 0, offsets from 2).
    pub fn nested(&self, i: usize) -> Option<VarArray<'otf>> {
        if self.indirections < 2 {
            return None;
        }
        let record = self.link(i).jump();
        if record.is_empty() {
            return None;
        }
        let count = record.u16(0).ok()?;
        Some(VarArray::new(
            record,
            2,
            usize::from(count),
            self.indirections - 1,
        ))
    }
}

/// Tag-keyed records sorted by tag, each holding a 16-bit offset into the
/// map's own base region. Lookup is a linear scan; N is tiny for every
/// OpenType usage of this shape.
#[derive(Debug, Copy, Clone)]
pub struct TagRecordMap<'otf> {
    base: View<'otf>,
    records: FixedArray<'otf>,
}

impl<'otf> TagRecordMap<'otf> {
    /// Reads a map whose u16 record count sits at `count_offset` within
    /// `base`, immediately followed by the (tag, offset) records. Offsets
    /// resolve against `base` itself.
    pub fn with_offset(base: View<'otf>, count_offset: usize) -> TagRecordMap<'otf> {
        let count = base.u16(count_offset).map(usize::from).unwrap_or(0);
        let records = base
            .view(count_offset + 2, count * 6)
            .map(|data| FixedArray::new(data, 6, count))
            .unwrap_or_else(|_| FixedArray::empty());
        TagRecordMap { base, records }
    }

    pub fn new(base: View<'otf>) -> TagRecordMap<'otf> {
        TagRecordMap::with_offset(base, 0)
    }

    pub fn empty() -> TagRecordMap<'otf> {
        TagRecordMap {
            base: View::default(),
            records: FixedArray::empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<(Tag, Link<'otf>)> {
        let record = self.records.get(i);
        if record.is_empty() {
            return None;
        }
        let tag = record.tag(0).ok()?;
        let offset = record.u16(4).ok()?;
        Some((tag, Link::new(self.base, usize::from(offset))))
    }

    /// First record carrying `tag`; the null link on a miss.
    pub fn lookup_tag(&self, tag: Tag) -> Link<'otf> {
        for i in 0..self.len() {
            if let Some((found, link)) = self.get(i) {
                if found == tag {
                    return link;
                }
            }
        }
        Link::null(self.base)
    }

    pub fn tags(&self) -> Vec<Tag> {
        (0..self.len()).filter_map(|i| self.get(i).map(|r| r.0)).collect()
    }
}

/// A polymorphic handle over one node of the table graph. Each node exposes
/// at most one of the capabilities; the others answer void.
#[derive(Debug, Clone)]
pub enum Navigator<'otf> {
    Link(Link<'otf>),
    Sequence(FixedArray<'otf>),
    Map(TagRecordMap<'otf>),
    Fields(View<'otf>),
    Void,
}

impl<'otf> Navigator<'otf> {
    pub fn is_void(&self) -> bool {
        match self {
            Navigator::Void => true,
            Navigator::Link(link) => link.is_null(),
            _ => false,
        }
    }

    pub fn as_link(&self) -> Option<&Link<'otf>> {
        match self {
            Navigator::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&FixedArray<'otf>> {
        match self {
            Navigator::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TagRecordMap<'otf>> {
        match self {
            Navigator::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&View<'otf>> {
        match self {
            Navigator::Fields(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_link_jump_preserves_base() {
        let bytes: &[u8] = &[0xAA, 0xBB, 0x00, 0x2A];

        let base = View::new(bytes);
        let link = Link::new(base, 2);
        assert!(!link.is_null());
        assert_eq!(link.jump().u16(0).unwrap(), 42);
    }

    #[test]
    fn case_null_link() {
        let link = Link::null(View::new(&[1, 2, 3]));
        assert!(link.is_null());
        assert!(link.jump().is_empty());
    }

    #[test]
    fn case_fixed_array_out_of_range() {
        let bytes: &[u8] = &[0, 1, 0, 2, 0, 3];

        let array = FixedArray::new(View::new(bytes), 2, 3);
        assert_eq!(array.get(1).u16(0).unwrap(), 2);
        assert!(array.get(3).is_empty());
    }

    #[test]
    fn case_tag_record_map_lookup() {
        // count = 2, records: ("case", 0x0010), ("liga", 0x0020)
        let bytes: &[u8] = &[
            0x00, 0x02, b'c', b'a', b's', b'e', 0x00, 0x10, b'l', b'i', b'g', b'a', 0x00, 0x20,
        ];

        let map = TagRecordMap::new(View::new(bytes));
        assert_eq!(map.len(), 2);
        assert_eq!(map.tags(), vec![Tag::new(b"case"), Tag::new(b"liga")]);
        assert_eq!(map.lookup_tag(Tag::new(b"liga")).offset(), 0x20);
        assert!(map.lookup_tag(Tag::new(b"smcp")).is_null());
    }

    #[test]
    fn case_var_array_shallow_and_deep() {
        // Two-level offset table: entry 0 at offset 6 is itself a
        // (count, offsets) table whose first record sits at offset 4.
        let bytes: &[u8] = &[
            0x00, 0x01, // count
            0x00, 0x06, // offset of entry 0
            0x00, 0x00, // padding
            0x00, 0x01, 0x00, 0x04, 0x12, 0x34, // nested table + record bytes
        ];

        let base = View::new(bytes);
        let array = VarArray::new(base, 2, 1, 2);

        let shallow = array.get(0, false);
        assert_eq!(shallow.u16(0).unwrap(), 1);

        let deep = array.get(0, true);
        assert_eq!(deep.u16(0).unwrap(), 0x1234);

        let nested = array.nested(0).unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested.get(0, false).u16(0).unwrap(), 0x1234);
    }

    #[test]
    fn case_var_array_zero_offset_terminates() {
        let bytes: &[u8] = &[0x00, 0x01, 0x00, 0x00];

        let array = VarArray::new(View::new(bytes), 2, 1, 1);
        assert!(array.link(0).is_null());
        assert!(array.get(0, true).is_empty());
    }

    #[test]
    fn case_navigator_void() {
        assert!(Navigator::Void.is_void());
        let null = Navigator::Link(Link::null(View::default()));
        assert!(null.is_void());
        assert!(null.as_map().is_none());
    }
}
