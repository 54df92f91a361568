//! Font parsing: turns an FLF v2 byte stream into an immutable [`Font`].

pub mod error;
pub mod glyphs;
mod header;

use std::collections::HashMap;
use std::io::{Cursor, Read};

pub use error::{FontError, ParseWarning};
pub use glyphs::Glyph;

use glyphs::{required_codepoints, strip_endmark};
use header::{parse_header, RawHeader};

use crate::layout::{normalize_layout, NormalizedLayout};
use crate::line_reader::{strip_bom, LineReader};

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const ZIP_ARCHIVE_LIMIT: u64 = 8 * 1024 * 1024;
const ZIP_ENTRY_LIMIT: u64 = 8 * 1024 * 1024;

/// Left-to-right or right-to-left composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintDirection {
    LeftToRight,
    RightToLeft,
}

impl PrintDirection {
    fn from_header_value(value: u8) -> Self {
        if value == 1 {
            PrintDirection::RightToLeft
        } else {
            PrintDirection::LeftToRight
        }
    }
}

/// An immutable, parsed FLF font. Once constructed it is never mutated, and
/// is freely shareable across concurrently-rendering threads.
#[derive(Debug, Clone)]
pub struct Font {
    pub(crate) hardblank: char,
    pub(crate) height: u32,
    pub(crate) baseline: u32,
    pub(crate) max_length: u32,
    pub(crate) old_layout: i32,
    pub(crate) full_layout: Option<u16>,
    pub(crate) print_direction: PrintDirection,
    pub(crate) glyphs: HashMap<char, Glyph>,
    pub(crate) layout: NormalizedLayout,
    pub(crate) warnings: Vec<ParseWarning>,
}

impl Font {
    pub fn hardblank(&self) -> char {
        self.hardblank
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    pub fn max_length(&self) -> u32 {
        self.max_length
    }

    pub fn old_layout(&self) -> i32 {
        self.old_layout
    }

    pub fn full_layout(&self) -> Option<u16> {
        self.full_layout
    }

    pub fn print_direction(&self) -> PrintDirection {
        self.print_direction
    }

    pub fn layout(&self) -> NormalizedLayout {
        self.layout
    }

    pub fn glyph(&self, codepoint: char) -> Option<&Glyph> {
        self.glyphs.get(&codepoint)
    }

    pub fn contains_glyph(&self, codepoint: char) -> bool {
        self.glyphs.contains_key(&codepoint)
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}

/// Parses an FLF v2 font from any readable byte stream.
///
/// Transparently unwraps a ZIP-wrapped font (detected by the PKZip local
/// file magic at the start of the stream), bounded to guard against
/// decompression bombs.
pub fn parse_font<R: Read>(mut reader: R) -> Result<Font, FontError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(crate::line_reader::LineReaderError::from)?;
    parse_font_bytes(&bytes)
}

fn parse_font_bytes(bytes: &[u8]) -> Result<Font, FontError> {
    if bytes.is_empty() {
        return Err(FontError::Empty);
    }
    if bytes.starts_with(&ZIP_MAGIC) {
        return parse_zip_wrapped(bytes);
    }
    let text_bytes = strip_bom(bytes);
    parse_flf_text(text_bytes)
}

fn parse_zip_wrapped(bytes: &[u8]) -> Result<Font, FontError> {
    if bytes.len() as u64 > ZIP_ARCHIVE_LIMIT {
        return Err(FontError::ArchiveEntryTooLarge {
            size: bytes.len() as u64,
            limit: ZIP_ARCHIVE_LIMIT,
        });
    }
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| FontError::Archive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| FontError::Archive(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        if entry.size() > ZIP_ENTRY_LIMIT {
            return Err(FontError::ArchiveEntryTooLarge {
                size: entry.size(),
                limit: ZIP_ENTRY_LIMIT,
            });
        }
        let mut inner = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut inner)
            .map_err(crate::line_reader::LineReaderError::from)?;
        return parse_font_bytes(&inner);
    }
    Err(FontError::Archive(
        "zip archive contains no file entries".to_string(),
    ))
}

fn parse_flf_text(bytes: &[u8]) -> Result<Font, FontError> {
    let mut lines = LineReader::new(Cursor::new(bytes));

    let header_line = loop {
        match lines.read_line()? {
            None => return Err(FontError::Empty),
            Some(line) if line.is_empty() => continue,
            Some(line) => break line,
        }
    };
    let raw: RawHeader = parse_header(&header_line)?;
    let layout = normalize_layout(raw.old_layout, raw.full_layout)?;
    let print_direction = PrintDirection::from_header_value(raw.print_direction.unwrap_or(0));

    for _ in 0..raw.comment_lines {
        if lines.read_line()?.is_none() {
            break;
        }
    }

    let mut glyph_map = HashMap::new();
    let mut warnings = Vec::new();

    let required = required_codepoints();
    for (idx, codepoint) in required.iter().enumerate() {
        match read_glyph(&mut lines, raw.height, *codepoint as u32, idx == 0)? {
            Some(glyph) => {
                check_max_length(&glyph, *codepoint as u32, raw.max_length, &mut warnings);
                glyph_map.insert(*codepoint, glyph);
            }
            None => break,
        }
    }

    if let Some(codetag_count) = raw.codetag_count {
        'codetags: for _ in 0..codetag_count {
            let tag_line = match lines.read_line()? {
                Some(l) => l,
                None => break 'codetags,
            };
            // An unparseable code or an out-of-range codepoint still owns
            // `height` glyph-body lines below it; those must be consumed
            // (not just skipped over) or every codetag header after this
            // one reads from the wrong line.
            let codepoint = parse_codetag_codepoint(&tag_line);
            let ch = codepoint.and_then(char::from_u32);
            match read_glyph(&mut lines, raw.height, codepoint.unwrap_or(0), false)? {
                Some(glyph) => {
                    if let (Some(codepoint), Some(ch)) = (codepoint, ch) {
                        check_max_length(&glyph, codepoint, raw.max_length, &mut warnings);
                        glyph_map.insert(ch, glyph);
                    }
                }
                None => break 'codetags,
            }
        }
    }

    Ok(Font {
        hardblank: raw.hardblank,
        height: raw.height,
        baseline: raw.baseline,
        max_length: raw.max_length,
        old_layout: raw.old_layout,
        full_layout: raw.full_layout,
        print_direction,
        glyphs: glyph_map,
        layout,
        warnings,
    })
}

fn read_glyph<R: Read>(
    lines: &mut LineReader<R>,
    height: u32,
    codepoint: u32,
    is_first_required: bool,
) -> Result<Option<Glyph>, FontError> {
    let mut rows = Vec::with_capacity(height as usize);
    for row_idx in 0..height {
        match lines.read_line()? {
            None => {
                if row_idx == 0 && !is_first_required {
                    return Ok(None);
                }
                return Err(FontError::TruncatedGlyph {
                    codepoint,
                    row: row_idx as usize,
                    height,
                });
            }
            Some(line) => rows.push(strip_endmark(&line)),
        }
    }

    let width = rows[0].len();
    for (row, line) in rows.iter().enumerate() {
        if line.len() != width {
            return Err(FontError::InconsistentGlyphWidth {
                codepoint,
                expected: width,
                row,
                got: line.len(),
            });
        }
    }

    Ok(Some(Glyph { rows, width }))
}

fn check_max_length(glyph: &Glyph, codepoint: u32, max_length: u32, warnings: &mut Vec<ParseWarning>) {
    if glyph.width as u32 > max_length {
        log::warn!(
            "glyph {codepoint:#06x} row width {} exceeds header max_length {max_length}",
            glyph.width
        );
        warnings.push(ParseWarning::MaxLengthExceeded {
            codepoint,
            width: glyph.width,
            max_length,
        });
    }
}

fn parse_codetag_codepoint(line: &str) -> Option<u32> {
    let token = line.split_whitespace().next()?;
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<i64>().ok().and_then(|v| u32::try_from(v).ok())
    }
}
