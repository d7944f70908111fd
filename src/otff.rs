//! Offset table and table record directory of an OpenType font file.
//!
//! https://docs.microsoft.com/en-gb/typography/opentype/spec/otff

use nom::multi::count;
use nom::number::complete::{be_u16, be_u32};
use nom::IResult;

use crate::error::Error;
use crate::types::{Offset32, Tag};

/// Font file format type, from the magic number at offset 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FontType {
    /// 0x00010000, TrueType outlines
    TrueType,
    /// 0x4F54544F ('OTTO'), CFF outlines
    Cff,
    /// 0x74727565 ('true'), legacy Macintosh TrueType
    AppleTrue,
}

impl FontType {
    pub fn parse(value: u32) -> Option<FontType> {
        match value {
            0x0001_0000 => Some(FontType::TrueType),
            0x4F54_544F => Some(FontType::Cff),
            0x7472_7565 => Some(FontType::AppleTrue),
            _ => None,
        }
    }
}

/// The OpenType font starts with the offset table. The table records that
/// follow it must be sorted in ascending order by tag; offsets are measured
/// from the start of the font file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OffsetTable {
    font_type: FontType,
    num_tables: u16,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
}

impl OffsetTable {
    pub fn font_type(&self) -> FontType {
        self.font_type
    }

    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }
}

pub fn parse_offset_table(input: &[u8]) -> IResult<&[u8], OffsetTable> {
    let (input, magic) = be_u32(input)?;
    let font_type = match FontType::parse(magic) {
        Some(font_type) => font_type,
        None => {
            return Err(nom::Err::Error((input, nom::error::ErrorKind::Switch)));
        }
    };
    let (input, num_tables) = be_u16(input)?;
    let (input, search_range) = be_u16(input)?;
    let (input, entry_selector) = be_u16(input)?;
    let (input, range_shift) = be_u16(input)?;

    Ok((
        input,
        OffsetTable {
            font_type,
            num_tables,
            search_range,
            entry_selector,
            range_shift,
        },
    ))
}

/// One 16-byte directory entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TableRecord {
    table_tag: Tag,
    checksum: u32,
    offset: Offset32,
    length: u32,
}

impl TableRecord {
    pub fn table_tag(&self) -> Tag {
        self.table_tag
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn offset(&self) -> Offset32 {
        self.offset
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

pub fn parse_table_record(input: &[u8]) -> IResult<&[u8], TableRecord> {
    let (input, tag) = nom::bytes::complete::take(4usize)(input)?;
    let (input, checksum) = be_u32(input)?;
    let (input, offset) = be_u32(input)?;
    let (input, length) = be_u32(input)?;

    Ok((
        input,
        TableRecord {
            table_tag: Tag::new(tag),
            checksum,
            offset,
            length,
        },
    ))
}

pub fn parse_table_records(input: &[u8], num_tables: u16) -> IResult<&[u8], Vec<TableRecord>> {
    count(parse_table_record, usize::from(num_tables))(input)
}

/// Parses and validates the whole directory: magic number, ascending tag
/// order, 4-byte offset alignment and table extents within the file.
pub fn parse_directory(buf: &[u8]) -> Result<(OffsetTable, Vec<TableRecord>), Error> {
    let (remainder, offset_table) = parse_offset_table(buf)
        .map_err(|_| Error::font_format("unsupported sfnt magic number"))?;
    let (_, records) = parse_table_records(remainder, offset_table.num_tables())?;

    let mut previous: Option<Tag> = None;
    for record in &records {
        if let Some(previous) = previous {
            if record.table_tag() <= previous {
                return Err(Error::font_format("directory records out of tag order"));
            }
        }
        previous = Some(record.table_tag());

        if record.offset() % 4 != 0 {
            return Err(Error::font_format(format!(
                "table '{}' offset {} not 4-byte aligned",
                record.table_tag(),
                record.offset()
            )));
        }

        let end = u64::from(record.offset()) + u64::from(record.length());
        if end > buf.len() as u64 {
            return Err(Error::font_format(format!(
                "table '{}' extends past end of file",
                record.table_tag()
            )));
        }
    }

    Ok((offset_table, records))
}
