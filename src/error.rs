use std::error;
use std::fmt::{self, Display};

/// Errors produced while parsing a font or reading table data.
///
/// `FontFormat` is the single user-visible surface for malformed fonts.
/// `Bounds` is fatal during parsing but demoted to `.notdef` / empty results
/// on lookup paths that document it. `Unsupported` marks format versions
/// beyond the handled range; fatal for required tables, tolerated for
/// auxiliary ones.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    FontFormat(String),
    Bounds { offset: usize, len: usize },
    Unsupported(String),
}

impl Error {
    pub fn font_format<T: Display>(reason: T) -> Error {
        Error::FontFormat(reason.to_string())
    }

    pub fn unsupported<T: Display>(what: T) -> Error {
        Error::Unsupported(what.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FontFormat(reason) => write!(formatter, "OpenType font format: {}", reason),
            Error::Bounds { offset, len } => {
                write!(formatter, "read at offset {} outside {} byte region", offset, len)
            }
            Error::Unsupported(what) => write!(formatter, "unsupported: {}", what),
        }
    }
}

impl error::Error for Error {}

impl<'a> From<nom::Err<(&'a [u8], nom::error::ErrorKind)>> for Error {
    fn from(err: nom::Err<(&'a [u8], nom::error::ErrorKind)>) -> Self {
        match err {
            nom::Err::Incomplete(_) => Error::font_format("truncated table data"),
            nom::Err::Error((_, kind)) | nom::Err::Failure((_, kind)) => {
                Error::font_format(format!("bad table data ({:?})", kind.description()))
            }
        }
    }
}
