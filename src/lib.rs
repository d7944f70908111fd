//! Safe, fast and memory efficient OpenType font parser and glyph mapper.
//!
//! The crate gives read-only, zero-copy access to the internal structure of
//! SFNT container fonts and performs initial glyph mapping for text
//! shaping: given a Unicode string, a font, a script tag and a language
//! tag, it produces the font-appropriate glyph sequence with advance
//! widths, honoring OpenType normalization rules and the glyph repertoire
//! the font actually carries.
//!
//! ```no_run
//! use otshape::{GlyphBuffer, Tag};
//!
//! let bytes = std::fs::read("Calibri.ttf").unwrap();
//! let font = otshape::parse(&bytes).unwrap();
//!
//! let mut buffer = GlyphBuffer::new();
//! let count = buffer
//!     .map_glyphs("Café", &font, Tag::new(b"latn"), otshape::DFLT)
//!     .unwrap();
//!
//! for shaped in buffer.iter().take(count) {
//!     println!("glyph {} advance {}", shaped.glyph, shaped.advance);
//! }
//! ```

#[macro_use]
extern crate bitflags;

pub mod error;
pub mod features;
pub mod font;
pub mod layout;
pub mod metrics;
pub mod nav;
pub mod otff;
pub mod script;
pub mod shape;
pub mod table;
pub mod tables;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod testutil;

pub use crate::error::Error;
pub use crate::features::{
    apply_feature, feature_info, font_features, font_supports_script, FeatureInfo, FeatureKind,
};
pub use crate::font::Font;
pub use crate::metrics::{font_metrics, glyph_metrics, FontMetrics, GlyphMetrics};
pub use crate::otff::FontType;
pub use crate::script::{language_tag_for_language, script_tag_for_script, DFLT};
pub use crate::shape::{GlyphBuffer, ShapedGlyph};
pub use crate::table::Table;
pub use crate::types::{GlyphId, Rect, TableTag, Tag, NOTDEF};

/// Parses a single SFNT font from a byte buffer.
pub fn parse(buf: &[u8]) -> Result<Font, Error> {
    Font::parse(buf)
}
