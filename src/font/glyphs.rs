/// A single FIGcharacter: `height` rows of identical rune-count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub(crate) rows: Vec<Vec<char>>,
    pub(crate) width: usize,
}

impl Glyph {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

/// The required codepoints, in the order real `.flf` fonts lay them out:
/// space, then the printable ASCII range, then the seven German letters.
pub fn required_codepoints() -> Vec<char> {
    let mut codepoints = vec![' '];
    codepoints.extend((33u32..=126).map(|c| char::from_u32(c).unwrap()));
    codepoints.extend(
        [196u32, 214, 220, 228, 246, 252, 223]
            .into_iter()
            .map(|c| char::from_u32(c).unwrap()),
    );
    codepoints
}

/// Strips the trailing run of identical runes (the "endmark") from a raw
/// glyph row, returning the row body as a rune sequence.
///
/// Real-world fonts vary the endmark run length (1, 2, 3, or more identical
/// trailing characters); this strips however many are present, matching
/// that permissive, real-world behavior rather than insisting on exactly
/// one or two. An endmark-only line yields an empty (zero-width) row, which
/// is the valid representation of an "empty" FIGcharacter.
pub fn strip_endmark(line: &str) -> Vec<char> {
    let mut chars: Vec<char> = line.chars().collect();
    let Some(&endmark) = chars.last() else {
        return chars;
    };
    while chars.last() == Some(&endmark) {
        chars.pop();
    }
    chars
}
