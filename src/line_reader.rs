use std::io::{self, BufRead, BufReader, Read};

use thiserror::Error;

/// Errors surfaced while pulling lines out of a font byte stream.
#[derive(Error, Debug)]
pub enum LineReaderError {
    /// An error occurred during a read operation on the underlying stream.
    #[error(transparent)]
    ReadError(#[from] io::Error),
}

/// A thin, sequential line reader over a font byte stream.
///
/// Unlike a binary table format, FLF fonts are read top to bottom once; there
/// is no seeking, so this wraps a plain `BufReader` rather than `Read + Seek`.
/// Lines are handed back with their trailing `\n`/`\r\n` stripped. A line
/// that is not valid UTF-8 is lossily decoded (invalid sequences become
/// `U+FFFD`) rather than failing the whole parse; endmark stripping still
/// behaves sensibly on the result.
pub struct LineReader<R: Read> {
    inner: BufReader<R>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    /// Reads the next line, or `None` at end of stream.
    pub fn read_line(&mut self) -> Result<Option<String>, LineReaderError> {
        let mut buf = Vec::new();
        let n = self.inner.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8(buf).unwrap_or_else(|e| {
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        })))
    }
}

/// Strips a UTF-8 BOM from the start of a byte slice, if present.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
    if bytes.starts_with(&BOM) {
        &bytes[3..]
    } else {
        bytes
    }
}
