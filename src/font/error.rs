use thiserror::Error;

use crate::layout::LayoutError;
use crate::line_reader::LineReaderError;

/// Everything that can go wrong turning a byte stream into a [`crate::Font`].
///
/// All variants are fatal to the parse; `parse_font` never returns a partial
/// `Font`.
#[derive(Error, Debug)]
pub enum FontError {
    #[error(transparent)]
    ReadError(#[from] LineReaderError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("missing or empty font data")]
    Empty,

    #[error("header line does not start with the FLF signature \"flf2a\"")]
    InvalidSignature,

    #[error("hardblank character must not be space, CR, LF or NUL")]
    InvalidHardblank,

    #[error("header field `{field}` is malformed: {message}")]
    InvalidHeaderField { field: &'static str, message: String },

    #[error("header field `{field}` value {value} is out of range")]
    ValueOutOfRange { field: &'static str, value: i64 },

    #[error("unexpected end of input while reading glyph for codepoint {codepoint:#06x} (row {row} of {height})")]
    TruncatedGlyph {
        codepoint: u32,
        row: usize,
        height: u32,
    },

    #[error(
        "glyph for codepoint {codepoint:#06x} has inconsistent row widths: row 0 is {expected} runes wide, row {row} is {got}"
    )]
    InconsistentGlyphWidth {
        codepoint: u32,
        expected: usize,
        row: usize,
        got: usize,
    },

    #[error("font archive entry is too large ({size} bytes, limit {limit} bytes)")]
    ArchiveEntryTooLarge { size: u64, limit: u64 },

    #[error("could not read font zip archive: {0}")]
    Archive(String),
}

/// A non-fatal diagnostic collected while parsing a font.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A glyph row was wider than the header's advisory `max_length`.
    #[error("glyph for codepoint {codepoint:#06x} is {width} runes wide, exceeding the header's max_length of {max_length}")]
    MaxLengthExceeded {
        codepoint: u32,
        width: usize,
        max_length: u32,
    },
}
