//! Naming Table
//!
//! The naming table associates multilingual strings with the font. Clients
//! look a string up by its platform ID, encoding ID, language ID and name
//! ID; storage is UTF-16BE for the Unicode and Windows platforms.
//!
//! More information on ['name'](https://docs.microsoft.com/en-gb/typography/opentype/spec/name)

use crate::error::Error;
use crate::view::View;

/// Well-known name IDs.
pub mod name_id {
    pub const FONT_FAMILY: u16 = 1;
    pub const FONT_SUBFAMILY: u16 = 2;
    pub const UNIQUE_ID: u16 = 3;
    pub const FULL_NAME: u16 = 4;
    pub const VERSION: u16 = 5;
    pub const POSTSCRIPT_NAME: u16 = 6;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    length: u16,
    offset: u16,
}

#[derive(Debug, Copy, Clone)]
pub struct Name<'otf> {
    data: View<'otf>,
    count: u16,
    string_offset: u16,
}

impl<'otf> Name<'otf> {
    pub fn parse(data: View<'otf>) -> Result<Name<'otf>, Error> {
        let format = data.u16(0)?;
        if format > 1 {
            return Err(Error::unsupported(format!("'name' format {}", format)));
        }
        let count = data.u16(2)?;
        let string_offset = data.u16(4)?;

        // every record must be addressable
        data.view(6, usize::from(count) * 12)?;

        Ok(Name {
            data,
            count,
            string_offset,
        })
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn record(&self, i: u16) -> Option<NameRecord> {
        if i >= self.count {
            return None;
        }
        let base = 6 + usize::from(i) * 12;
        Some(NameRecord {
            platform_id: self.data.u16(base).ok()?,
            encoding_id: self.data.u16(base + 2).ok()?,
            language_id: self.data.u16(base + 4).ok()?,
            name_id: self.data.u16(base + 6).ok()?,
            length: self.data.u16(base + 8).ok()?,
            offset: self.data.u16(base + 10).ok()?,
        })
    }

    /// Raw string bytes (UTF-16BE on Unicode/Windows platforms) for an exact
    /// (platform, encoding, language, name) key.
    pub fn lookup(
        &self,
        platform_id: u16,
        encoding_id: u16,
        language_id: u16,
        name_id: u16,
    ) -> Option<View<'otf>> {
        for i in 0..self.count {
            let record = self.record(i)?;
            if record.platform_id == platform_id
                && record.encoding_id == encoding_id
                && record.language_id == language_id
                && record.name_id == name_id
            {
                return self.string_bytes(&record);
            }
        }
        None
    }

    fn string_bytes(&self, record: &NameRecord) -> Option<View<'otf>> {
        let start = usize::from(self.string_offset) + usize::from(record.offset);
        self.data.view(start, usize::from(record.length)).ok()
    }

    /// Decoded string for `name_id`, preferring the Windows Unicode entry
    /// and falling back to any Unicode-platform record.
    pub fn string(&self, name_id: u16) -> Option<String> {
        // Windows, Unicode BMP, US English first
        if let Some(bytes) = self.lookup(3, 1, 0x0409, name_id) {
            return Some(decode_utf16_be(bytes.bytes()));
        }
        for i in 0..self.count {
            let record = self.record(i)?;
            if record.name_id != name_id {
                continue;
            }
            if record.platform_id == 0 || (record.platform_id == 3 && record.encoding_id == 1) {
                return self.string_bytes(&record).map(|b| decode_utf16_be(b.bytes()));
            }
        }
        None
    }

    pub fn family_name(&self) -> Option<String> {
        self.string(name_id::FONT_FAMILY)
    }

    pub fn subfamily_name(&self) -> Option<String> {
        self.string(name_id::FONT_SUBFAMILY)
    }

    pub fn full_name(&self) -> Option<String> {
        self.string(name_id::FULL_NAME)
    }

    pub fn postscript_name(&self) -> Option<String> {
        self.string(name_id::POSTSCRIPT_NAME)
    }
}

fn decode_utf16_be(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    std::char::decode_utf16(units)
        .map(|r| r.unwrap_or(std::char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_fixture() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u16.to_be_bytes()); // format
        bytes.extend_from_slice(&2u16.to_be_bytes()); // count
        bytes.extend_from_slice(&30u16.to_be_bytes()); // stringOffset
        // (3, 1, 0x409, family), 8 bytes at 0
        for v in [3u16, 1, 0x409, 1, 8, 0] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        // (3, 1, 0x409, subfamily), 14 bytes at 8
        for v in [3u16, 1, 0x409, 2, 14, 8] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        for c in "Test".encode_utf16() {
            bytes.extend_from_slice(&c.to_be_bytes());
        }
        for c in "Regular".encode_utf16() {
            bytes.extend_from_slice(&c.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn case_name_lookup() {
        let bytes = name_fixture();
        let name = Name::parse(View::new(&bytes)).unwrap();

        assert_eq!(name.count(), 2);
        let raw = name.lookup(3, 1, 0x409, 1).unwrap();
        assert_eq!(raw.bytes(), &[0x00, b'T', 0x00, b'e', 0x00, b's', 0x00, b't']);
        assert_eq!(name.lookup(1, 0, 0, 1), None);
    }

    #[test]
    fn case_decoded_strings() {
        let bytes = name_fixture();
        let name = Name::parse(View::new(&bytes)).unwrap();

        assert_eq!(name.family_name().as_deref(), Some("Test"));
        assert_eq!(name.subfamily_name().as_deref(), Some("Regular"));
        assert_eq!(name.full_name(), None);
    }

    #[test]
    fn case_rejects_unknown_format() {
        let bytes: &[u8] = &[0x00, 0x02, 0x00, 0x00, 0x00, 0x06];
        assert!(Name::parse(View::new(bytes)).is_err());
    }
}
