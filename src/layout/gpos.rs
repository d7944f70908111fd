//! Glyph positioning lookups
//!
//! The positioning engine is classification-level only: lookup types are
//! identified and extension subtables (type 9) are unwrapped so clients can
//! inspect what a font carries, but no adjustment algorithms run here.
//! Applying a GPOS feature leaves the buffer unchanged.

use crate::view::View;

/// GPOS lookup types.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PositioningKind {
    Single,
    Pair,
    Cursive,
    MarkToBase,
    MarkToLigature,
    MarkToMark,
    Context,
    ChainedContext,
    Extension,
}

impl PositioningKind {
    pub fn from_lookup_type(lookup_type: u16) -> Option<PositioningKind> {
        match lookup_type {
            1 => Some(PositioningKind::Single),
            2 => Some(PositioningKind::Pair),
            3 => Some(PositioningKind::Cursive),
            4 => Some(PositioningKind::MarkToBase),
            5 => Some(PositioningKind::MarkToLigature),
            6 => Some(PositioningKind::MarkToMark),
            7 => Some(PositioningKind::Context),
            8 => Some(PositioningKind::ChainedContext),
            9 => Some(PositioningKind::Extension),
            _ => None,
        }
    }
}

/// Resolves the effective kind of a subtable, following one extension
/// indirection. Returns the kind and the target subtable.
pub fn classify_subtable<'otf>(
    lookup_type: u16,
    subtable: View<'otf>,
) -> Option<(PositioningKind, View<'otf>)> {
    let kind = PositioningKind::from_lookup_type(lookup_type)?;
    if kind != PositioningKind::Extension {
        return Some((kind, subtable));
    }

    if subtable.u16(0).ok()? != 1 {
        return None;
    }
    let embedded_type = subtable.u16(2).ok()?;
    if embedded_type == 9 {
        // reentrant extension
        return None;
    }
    let offset = subtable.u32(4).ok()? as usize;
    let target = subtable.tail(offset).ok()?;
    let embedded_kind = PositioningKind::from_lookup_type(embedded_type)?;
    Some((embedded_kind, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_plain_classification() {
        let bytes: &[u8] = &[0x00, 0x01];
        let (kind, _) = classify_subtable(2, View::new(bytes)).unwrap();
        assert_eq!(kind, PositioningKind::Pair);
        assert_eq!(PositioningKind::from_lookup_type(10), None);
    }

    #[test]
    fn case_extension_unwrap() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&4u16.to_be_bytes()); // mark-to-base
        bytes.extend_from_slice(&8u32.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes()); // target subtable

        let (kind, target) = classify_subtable(9, View::new(&bytes)).unwrap();
        assert_eq!(kind, PositioningKind::MarkToBase);
        assert_eq!(target.u16(0).unwrap(), 1);
    }

    #[test]
    fn case_reentrant_extension_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&9u16.to_be_bytes());
        bytes.extend_from_slice(&8u32.to_be_bytes());

        assert!(classify_subtable(9, View::new(&bytes)).is_none());
    }
}
