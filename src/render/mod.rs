//! Glyph composition: resolves each input rune to a glyph, overlaps
//! adjacent glyphs under the active horizontal layout, wraps at a width
//! budget, and finalizes hardblanks into spaces.

mod smush;

use std::io::{self, Write};

use thiserror::Error;

use crate::font::{Font, Glyph, PrintDirection};
use crate::layout::{self, HorizontalLayout, LayoutError, LayoutOverride, NormalizedLayout};
use smush::smush_pair;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("rune {0:?} is not present in this font, and the configured unknown-rune fallback isn't either")]
    UnsupportedRune(char),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Render-time configuration. See the format spec for the meaning of each
/// field; all are optional except `unknown_rune`, which defaults to `?`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub layout: Option<LayoutOverride>,
    pub print_direction: Option<PrintDirection>,
    pub unknown_rune: char,
    pub trim_whitespace: bool,
    pub width: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: None,
            print_direction: None,
            unknown_rune: '?',
            trim_whitespace: false,
            width: None,
        }
    }
}

struct ResolvedOptions {
    layout: NormalizedLayout,
    rtl: bool,
    unknown_rune: char,
    trim_whitespace: bool,
    width: Option<usize>,
}

fn resolve_options(font: &Font, opts: &RenderOptions) -> Result<ResolvedOptions, RenderError> {
    let layout = match &opts.layout {
        Some(override_) => layout::merge_layout_override(&font.layout(), override_)?,
        None => font.layout(),
    };
    let rtl = match opts.print_direction {
        Some(PrintDirection::RightToLeft) => true,
        Some(PrintDirection::LeftToRight) => false,
        None => font.print_direction() == PrintDirection::RightToLeft,
    };
    Ok(ResolvedOptions {
        layout,
        rtl,
        unknown_rune: opts.unknown_rune,
        trim_whitespace: opts.trim_whitespace,
        width: opts.width,
    })
}

fn resolve_glyph<'f>(font: &'f Font, ch: char, unknown_rune: char) -> Result<&'f Glyph, RenderError> {
    let is_control = (ch as u32) < 0x20 || ch == '\u{7F}';
    if !is_control {
        if let Some(glyph) = font.glyph(ch) {
            return Ok(glyph);
        }
    }
    font.glyph(unknown_rune)
        .ok_or(RenderError::UnsupportedRune(ch))
}

fn leading_edge(row: &[char]) -> (usize, Option<char>) {
    let mut count = 0;
    for &c in row {
        if c == ' ' {
            count += 1;
        } else {
            return (count, Some(c));
        }
    }
    (count, None)
}

fn trailing_edge(row: &[char]) -> (usize, Option<char>) {
    let mut count = 0;
    for &c in row.iter().rev() {
        if c == ' ' {
            count += 1;
        } else {
            return (count, Some(c));
        }
    }
    (count, None)
}

/// Step 1-2 of the overlap algorithm: the maximum overlap `k` that keeps
/// every row valid, as the minimum per-row smush amount across the glyph's
/// height, with the mode's effect (full/fitting/smushing) already applied.
fn compute_overlap(
    acc_rows: &[Vec<char>],
    new_rows: &[Vec<char>],
    mode: &HorizontalLayout,
    hardblank: char,
    rtl: bool,
) -> usize {
    if matches!(mode, HorizontalLayout::Full) {
        return 0;
    }
    let acc_width = acc_rows[0].len();
    let new_width = new_rows[0].len();
    let mut k = new_width;

    for row_idx in 0..acc_rows.len() {
        let (left, right): (&[char], &[char]) = if rtl {
            (&new_rows[row_idx], &acc_rows[row_idx])
        } else {
            (&acc_rows[row_idx], &new_rows[row_idx])
        };
        let (ta, ch1) = trailing_edge(left);
        let (tg, ch2) = leading_edge(right);

        let smush_r = match mode {
            HorizontalLayout::Fitting => ta + tg,
            _ => match (ch1, ch2) {
                (None, _) => ta + tg + 1,
                (Some(c1), Some(c2)) if smush_pair(mode, hardblank, c1, c2, rtl).is_some() => {
                    ta + tg + 1
                }
                _ => ta + tg,
            },
        };
        k = k.min(smush_r);
    }

    k.min(acc_width).min(new_width)
}

/// Step 4: merges one pair of rows given the overlap amount `k`, operating
/// in terms of true physical left/right so the order-sensitive rules (big
/// X, opposite pairs) see real adjacency regardless of print direction.
fn merge_row(
    acc_row: &[char],
    new_row: &[char],
    k: usize,
    mode: &HorizontalLayout,
    hardblank: char,
    rtl: bool,
) -> Vec<char> {
    let (left, right): (&[char], &[char]) = if rtl {
        (new_row, acc_row)
    } else {
        (acc_row, new_row)
    };
    let ll = left.len();
    let mut result = Vec::with_capacity(ll + right.len() - k);
    result.extend_from_slice(&left[..ll - k]);
    for i in 0..k {
        let lch = left[ll - k + i];
        let rch = right[i];
        let merged = if lch == ' ' {
            rch
        } else if rch == ' ' {
            lch
        } else {
            smush_pair(mode, hardblank, lch, rch, rtl).unwrap_or(rch)
        };
        result.push(merged);
    }
    result.extend_from_slice(&right[k..]);
    result
}

fn append_glyph(
    acc: &mut [Vec<char>],
    glyph: &Glyph,
    mode: &HorizontalLayout,
    hardblank: char,
    rtl: bool,
) {
    let k = compute_overlap(acc, &glyph.rows, mode, hardblank, rtl);
    for (row_idx, glyph_row) in glyph.rows.iter().enumerate() {
        let merged = merge_row(&acc[row_idx], glyph_row, k, mode, hardblank, rtl);
        acc[row_idx] = merged;
    }
}

fn render_rows(text: &str, font: &Font, options: &RenderOptions) -> Result<Vec<String>, RenderError> {
    let resolved = resolve_options(font, options)?;
    let height = font.height() as usize;
    let mode = resolved.layout.horizontal;
    let hardblank = font.hardblank();

    let mut blocks: Vec<Vec<Vec<char>>> = Vec::new();
    let mut line: Vec<Vec<char>> = vec![Vec::new(); height];
    let mut break_point: Option<usize> = None;

    for ch in text.chars() {
        let glyph = resolve_glyph(font, ch, resolved.unknown_rune)?;

        let mut trial = line.clone();
        append_glyph(&mut trial, glyph, &mode, hardblank, resolved.rtl);
        let trial_width = trial[0].len();
        let fits = resolved.width.map_or(true, |w| trial_width <= w);

        if fits {
            line = trial;
        } else if let Some(bp) = break_point {
            log::debug!("width budget exceeded, wrapping at column {bp}");
            let mut carry = Vec::with_capacity(height);
            let mut completed = Vec::with_capacity(height);
            for row in &line {
                completed.push(row[..bp].to_vec());
                carry.push(row[bp..].to_vec());
            }
            blocks.push(completed);
            line = carry;
            append_glyph(&mut line, glyph, &mode, hardblank, resolved.rtl);
            break_point = None;
        } else {
            log::debug!("single word exceeds width budget; emitting unbroken");
            line = trial;
        }

        if ch == ' ' {
            break_point = Some(line[0].len());
        }
    }
    blocks.push(line);

    let mut rows = Vec::with_capacity(blocks.len() * height);
    for block in blocks {
        for row in block {
            let mut s: String = row
                .into_iter()
                .map(|c| if c == hardblank { ' ' } else { c })
                .collect();
            if resolved.trim_whitespace {
                let trimmed_len = s.trim_end().len();
                s.truncate(trimmed_len);
            }
            rows.push(s);
        }
    }
    Ok(rows)
}

/// Renders `text` with `font`, producing a single string with rows joined
/// by `\n`. Always produces a multiple of `font.height()` lines: one
/// multiple per wrapped segment when `options.width` forces a line break,
/// exactly `font.height()` lines otherwise.
pub fn render(text: &str, font: &Font, options: &RenderOptions) -> Result<String, RenderError> {
    Ok(render_rows(text, font, options)?.join("\n"))
}

/// Same as [`render`], but writes each row (with a trailing newline) to
/// `sink` instead of building one owned string.
pub fn render_to<W: Write>(
    sink: &mut W,
    text: &str,
    font: &Font,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    for row in render_rows(text, font, options)? {
        writeln!(sink, "{row}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::parse_font;
    use std::io::Cursor;

    fn font_from_rows(hardblank: char, height: u32, old_layout: i32, glyphs: &[(char, &[&str])]) -> Font {
        let mut text = format!("flf2a{hardblank} {height} {height} 200 {old_layout} 0\n");
        let required = crate::font::glyphs::required_codepoints();
        for codepoint in &required {
            if let Some((_, rows)) = glyphs.iter().find(|(c, _)| c == codepoint) {
                for row in *rows {
                    text.push_str(row);
                    text.push('@');
                    text.push('\n');
                }
            } else {
                for _ in 0..height {
                    text.push_str("@\n");
                }
            }
        }
        parse_font(Cursor::new(text.into_bytes())).unwrap()
    }

    #[test]
    fn full_width_places_glyphs_side_by_side() {
        let font = font_from_rows('$', 1, -1, &[('H', &["H"]), ('I', &["I"])]);
        let out = render("HI", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out, "HI");
    }

    #[test]
    fn full_width_with_space_between() {
        let font = font_from_rows(
            '$',
            1,
            -1,
            &[('H', &["H"]), ('I', &["I"]), (' ', &[" "])],
        );
        let out = render("H I", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out, "H I");
    }

    #[test]
    fn fitting_moves_glyphs_together() {
        // Trailing blank of 'H' and leading blank of 'I' touch and vanish;
        // fitting kerns flush, it does not smush any ink together.
        let font = font_from_rows('$', 1, -2, &[('H', &["H "]), ('I', &[" I"])]);
        let out = render("HI", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out, "HI");
    }

    #[test]
    fn smushing_hierarchy_rule() {
        // rule 3 only: bit index 2 -> old_layout value 4
        let font = font_from_rows('$', 1, 4, &[('|', &["|"]), ('/', &["/"])]);
        let out = render("|/", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out, "/");
    }

    #[test]
    fn smushing_opposite_pair_rule() {
        // rule 4 only: bit index 3 -> old_layout value 8
        let font = font_from_rows('$', 1, 8, &[('(', &["("]), (')', &[")"])]);
        let out = render("()", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out, "|");
    }

    #[test]
    fn hardblank_becomes_space_in_output() {
        let font = font_from_rows('$', 1, -1, &[('H', &["H$"])]);
        let out = render("H", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out, "H ");
    }

    #[test]
    fn rtl_reverses_composition_order() {
        let font = font_from_rows('$', 1, -1, &[('H', &["H"]), ('I', &["I"])]);
        let ltr = render("HI", &font, &RenderOptions::default()).unwrap();
        let mut opts = RenderOptions::default();
        opts.print_direction = Some(PrintDirection::RightToLeft);
        let rtl = render("HI", &font, &opts).unwrap();
        assert_eq!(ltr, "HI");
        assert_eq!(rtl, "IH");
    }

    #[test]
    fn empty_input_produces_height_blank_lines() {
        let font = font_from_rows('$', 3, -1, &[]);
        let out = render("", &font, &RenderOptions::default()).unwrap();
        assert_eq!(out.split('\n').count(), 3);
        assert!(out.split('\n').all(|l| l.is_empty()));
    }

    #[test]
    fn unsupported_rune_without_fallback_is_an_error() {
        let font = font_from_rows('$', 1, -1, &[]);
        let mut opts = RenderOptions::default();
        opts.unknown_rune = '\u{1}'; // definitely absent, and itself a control char
        let err = render("\u{E000}", &font, &opts).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedRune(_)));
    }

    #[test]
    fn width_budget_wraps_on_word_boundary() {
        let font = font_from_rows(
            '$',
            1,
            -1,
            &[('H', &["HHH"]), ('I', &["III"]), (' ', &[" "])],
        );
        let mut opts = RenderOptions::default();
        opts.width = Some(7);
        let out = render("HI HI HI", &font, &opts).unwrap();
        let lines: Vec<&str> = out.split('\n').collect();
        assert!(lines.iter().all(|l| l.chars().count() <= 7));
        assert_eq!(lines.len(), 3); // three wrapped segments, each height 1
    }
}
