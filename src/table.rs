use byteorder::{BigEndian, ByteOrder};

use crate::types::{TableTag, Tag};
use crate::view::View;

/// A view over one directory entry's bytes: `[offset, offset + length)` of
/// the font buffer. Ownership of the bytes stays with the font.
#[derive(Debug, Copy, Clone)]
pub struct Table<'otf> {
    tag: Tag,
    table_tag: Option<TableTag>,
    checksum: u32,
    offset: usize,
    length: usize,
    data: View<'otf>,
}

impl<'otf> Table<'otf> {
    pub(crate) fn new(
        tag: Tag,
        checksum: u32,
        offset: usize,
        length: usize,
        data: View<'otf>,
    ) -> Table<'otf> {
        Table {
            tag,
            table_tag: TableTag::parse(tag),
            checksum,
            offset,
            length,
            data,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The interpreted table kind; None for tags the pipeline does not read.
    pub fn table_tag(&self) -> Option<TableTag> {
        self.table_tag
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn view(&self) -> View<'otf> {
        self.data
    }

    /// Recomputes the table checksum and compares it against the directory
    /// entry. The 'head' table's checkSumAdjustment field is excluded from
    /// its own sum.
    pub fn validate(&self) -> bool {
        let mut sum: u32 = 0;

        for (index, chunk) in self.data.bytes().chunks(4).enumerate() {
            if self.table_tag == Some(TableTag::Head) && index == 2 {
                continue;
            }

            let word = if chunk.len() == 4 {
                BigEndian::read_u32(chunk)
            } else {
                // Tables are padded with zeros to a 4-byte boundary for the
                // checksum; the directory length may exclude the padding.
                let mut padded = [0u8; 4];
                padded[..chunk.len()].copy_from_slice(chunk);
                BigEndian::read_u32(&padded)
            };
            sum = sum.wrapping_add(word);
        }

        sum == self.checksum
    }
}
