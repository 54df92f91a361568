//! Parses the command-line `--unknown-rune` argument into a single `char`.
//!
//! Accepts a literal rune, or one of several numeric escapes: `\uXXXX`,
//! `\UXXXXXXXX`, `U+XXXX`, a bare decimal codepoint, or a `0x`-prefixed hex
//! codepoint.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnknownRuneSpecError {
    #[error("{0:?} is not a single rune and not a recognized numeric escape")]
    NotARune(String),

    #[error("{spec:?} decodes to codepoint {value:#x}, which is not a valid Unicode scalar value")]
    InvalidCodepoint { spec: String, value: u32 },

    #[error("{spec:?} has a malformed numeric escape: {message}")]
    MalformedEscape { spec: String, message: String },
}

fn from_codepoint(spec: &str, value: u32) -> Result<char, UnknownRuneSpecError> {
    char::from_u32(value).ok_or(UnknownRuneSpecError::InvalidCodepoint {
        spec: spec.to_string(),
        value,
    })
}

fn parse_hex(spec: &str, digits: &str) -> Result<u32, UnknownRuneSpecError> {
    u32::from_str_radix(digits, 16).map_err(|e| UnknownRuneSpecError::MalformedEscape {
        spec: spec.to_string(),
        message: e.to_string(),
    })
}

/// Parses a single `--unknown-rune` argument.
pub fn parse_spec(s: &str) -> Result<char, UnknownRuneSpecError> {
    if let Some(hex) = s.strip_prefix("\\u") {
        return from_codepoint(s, parse_hex(s, hex)?);
    }
    if let Some(hex) = s.strip_prefix("\\U") {
        return from_codepoint(s, parse_hex(s, hex)?);
    }
    if let Some(hex) = s.strip_prefix("U+").or_else(|| s.strip_prefix("u+")) {
        return from_codepoint(s, parse_hex(s, hex)?);
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return from_codepoint(s, parse_hex(s, hex)?);
    }
    if let Ok(value) = s.parse::<u32>() {
        if s.chars().count() > 1 {
            return from_codepoint(s, value);
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(UnknownRuneSpecError::NotARune(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_rune() {
        assert_eq!(parse_spec("?").unwrap(), '?');
        assert_eq!(parse_spec("€").unwrap(), '€');
    }

    #[test]
    fn backslash_u_escape() {
        assert_eq!(parse_spec("\\u003F").unwrap(), '?');
    }

    #[test]
    fn backslash_capital_u_escape() {
        assert_eq!(parse_spec("\\U0001F600").unwrap(), '\u{1F600}');
    }

    #[test]
    fn u_plus_escape() {
        assert_eq!(parse_spec("U+003F").unwrap(), '?');
    }

    #[test]
    fn decimal_codepoint() {
        assert_eq!(parse_spec("63").unwrap(), '?');
    }

    #[test]
    fn hex_0x_codepoint() {
        assert_eq!(parse_spec("0x3F").unwrap(), '?');
    }

    #[test]
    fn single_ascii_digit_is_literal_not_decimal() {
        // A single-character spec is always the literal rune, even if it
        // happens to be a digit -- "9" means the glyph for '9'.
        assert_eq!(parse_spec("9").unwrap(), '9');
    }

    #[test]
    fn multi_char_garbage_is_an_error() {
        assert!(parse_spec("nope").is_err());
    }

    #[test]
    fn invalid_codepoint_is_an_error() {
        let err = parse_spec("0xD800").unwrap_err();
        assert!(matches!(err, UnknownRuneSpecError::InvalidCodepoint { .. }));
    }

    #[test]
    fn malformed_hex_escape_is_an_error() {
        let err = parse_spec("\\uZZZZ").unwrap_err();
        assert!(matches!(err, UnknownRuneSpecError::MalformedEscape { .. }));
    }
}
