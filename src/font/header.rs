use super::error::FontError;

/// The raw, unnormalized contents of an FLF header line.
#[derive(Debug, Clone)]
pub struct RawHeader {
    pub hardblank: char,
    pub height: u32,
    pub baseline: u32,
    pub max_length: u32,
    pub old_layout: i32,
    pub comment_lines: u32,
    pub print_direction: Option<u8>,
    pub full_layout: Option<u16>,
    pub codetag_count: Option<u32>,
}

const SIGNATURE: &str = "flf2a";

/// Parses the first (non-empty, post-BOM) line of a font file.
///
/// Grammar: `flf2a<hardblank> height baseline max_length old_layout
/// comment_lines [print_direction [full_layout [codetag_count]]]`.
pub fn parse_header(line: &str) -> Result<RawHeader, FontError> {
    if !line.starts_with(SIGNATURE) {
        return Err(FontError::InvalidSignature);
    }

    let mut chars = line.chars();
    for _ in 0..SIGNATURE.chars().count() {
        chars.next();
    }
    let hardblank = chars.next().ok_or(FontError::InvalidHardblank)?;
    if hardblank == ' ' || hardblank == '\r' || hardblank == '\n' || hardblank == '\0' {
        return Err(FontError::InvalidHardblank);
    }

    let rest: String = chars.collect();
    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(FontError::InvalidHeaderField {
            field: "header",
            message: format!(
                "expected at least 5 fields after the hardblank, got {}",
                fields.len()
            ),
        });
    }

    let height: u32 = parse_field(&fields, 0, "height")?;
    let baseline: u32 = parse_field(&fields, 1, "baseline")?;
    let max_length: u32 = parse_field(&fields, 2, "max_length")?;
    let old_layout: i32 = parse_field(&fields, 3, "old_layout")?;
    let comment_lines: u32 = parse_field(&fields, 4, "comment_lines")?;

    let print_direction = match fields.get(5) {
        Some(s) => Some(parse_str::<u8>(s, "print_direction")?),
        None => None,
    };
    let full_layout = match fields.get(6) {
        Some(s) => Some(parse_str::<u16>(s, "full_layout")?),
        None => None,
    };
    let codetag_count = match fields.get(7) {
        Some(s) => Some(parse_str::<u32>(s, "codetag_count")?),
        None => None,
    };

    if height == 0 {
        return Err(FontError::ValueOutOfRange {
            field: "height",
            value: height as i64,
        });
    }
    if baseline == 0 || baseline > height {
        return Err(FontError::ValueOutOfRange {
            field: "baseline",
            value: baseline as i64,
        });
    }
    if max_length == 0 {
        return Err(FontError::ValueOutOfRange {
            field: "max_length",
            value: max_length as i64,
        });
    }
    if !(-3..=63).contains(&old_layout) {
        return Err(FontError::ValueOutOfRange {
            field: "old_layout",
            value: old_layout as i64,
        });
    }
    if let Some(pd) = print_direction {
        if pd > 1 {
            return Err(FontError::ValueOutOfRange {
                field: "print_direction",
                value: pd as i64,
            });
        }
    }
    if let Some(fl) = full_layout {
        if fl > 32767 {
            return Err(FontError::ValueOutOfRange {
                field: "full_layout",
                value: fl as i64,
            });
        }
    }

    Ok(RawHeader {
        hardblank,
        height,
        baseline,
        max_length,
        old_layout,
        comment_lines,
        print_direction,
        full_layout,
        codetag_count,
    })
}

fn parse_field<T>(fields: &[&str], idx: usize, name: &'static str) -> Result<T, FontError>
where
    T: std::str::FromStr,
{
    parse_str(fields[idx], name)
}

fn parse_str<T>(s: &str, name: &'static str) -> Result<T, FontError>
where
    T: std::str::FromStr,
{
    s.parse::<T>().map_err(|_| FontError::InvalidHeaderField {
        field: name,
        message: format!("could not parse {s:?} as a number"),
    })
}
