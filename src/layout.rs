//! Pure mapping from an FLF header's layout integers onto a tagged
//! [`NormalizedLayout`], plus the merge rules applied when a caller
//! overrides a font's layout at render time.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("old_layout {0} is outside the valid range [-3, 63]")]
    InvalidOldLayoutRange(i32),

    #[error("full_layout {0} is outside the valid range [0, 32767]")]
    InvalidFullLayoutRange(i32),

    #[error(
        "layout override must select exactly one of Full, Fitting or Smushing, got {selected} selected"
    )]
    ConflictingFittingModes { selected: u8 },
}

/// The horizontal composition mode. Modeled as a sum type so that
/// "controlled smushing with zero rule bits" (an illegal state per the
/// font format) cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalLayout {
    Full,
    Fitting,
    SmushingControlled { rules: u8 },
    SmushingUniversal,
}

/// The vertical composition mode, parsed for completeness but never
/// consulted by the renderer (vertical smushing is out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalLayout {
    Full,
    Fitting,
    SmushingControlled { rules: u8 },
    SmushingUniversal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedLayout {
    pub horizontal: HorizontalLayout,
    pub vertical: VerticalLayout,
}

/// All six controlled-smushing rule bits, for when a caller requests
/// smushing without naming any specific rules and the font has none to
/// fall back on either.
pub const ALL_HORIZONTAL_RULES: u8 = 0b0011_1111;
pub const ALL_VERTICAL_RULES: u8 = 0b0001_1111;

/// Maps `(old_layout, full_layout, full_layout_set)` onto a
/// [`NormalizedLayout`]. Precedence is strict: if `full_layout_set`,
/// `full_layout` wins entirely and `old_layout` is ignored.
pub fn normalize_layout(
    old_layout: i32,
    full_layout: Option<u16>,
) -> Result<NormalizedLayout, LayoutError> {
    match full_layout {
        Some(bits) => normalize_full_layout(bits),
        None => normalize_old_layout(old_layout),
    }
}

fn normalize_old_layout(old_layout: i32) -> Result<NormalizedLayout, LayoutError> {
    if !(-3..=63).contains(&old_layout) {
        return Err(LayoutError::InvalidOldLayoutRange(old_layout));
    }
    let horizontal = match old_layout {
        -3 => HorizontalLayout::SmushingUniversal,
        -2 | 0 => HorizontalLayout::Fitting,
        -1 => HorizontalLayout::Full,
        n if n > 0 => {
            let rules = (n as u8) & ALL_HORIZONTAL_RULES;
            if rules == 0 {
                HorizontalLayout::SmushingUniversal
            } else {
                HorizontalLayout::SmushingControlled { rules }
            }
        }
        n => return Err(LayoutError::InvalidOldLayoutRange(n)),
    };
    Ok(NormalizedLayout {
        horizontal,
        vertical: VerticalLayout::Full,
    })
}

fn normalize_full_layout(bits: u16) -> Result<NormalizedLayout, LayoutError> {
    if bits > 32767 {
        return Err(LayoutError::InvalidFullLayoutRange(bits as i32));
    }
    let horz_rules = (bits & 0b0011_1111) as u8;
    let horz_fitting = bits & (1 << 6) != 0;
    let horz_smushing = bits & (1 << 7) != 0;
    let vert_rules = ((bits >> 8) & 0b0001_1111) as u8;
    let vert_fitting = bits & (1 << 13) != 0;
    let vert_smushing = bits & (1 << 14) != 0;

    // Smushing beats fitting when both bits are set; rules == 0 under the
    // smushing bit means universal rather than controlled-with-no-rules.
    let horizontal = if horz_smushing {
        if horz_rules != 0 {
            HorizontalLayout::SmushingControlled { rules: horz_rules }
        } else {
            HorizontalLayout::SmushingUniversal
        }
    } else if horz_fitting {
        HorizontalLayout::Fitting
    } else {
        HorizontalLayout::Full
    };

    let vertical = if vert_smushing {
        if vert_rules != 0 {
            VerticalLayout::SmushingControlled { rules: vert_rules }
        } else {
            VerticalLayout::SmushingUniversal
        }
    } else if vert_fitting {
        VerticalLayout::Fitting
    } else {
        VerticalLayout::Full
    };

    Ok(NormalizedLayout {
        horizontal,
        vertical,
    })
}

/// A raw, pre-validation layout request as a caller would assemble it, e.g.
/// from a set of independent boolean flags, before it is merged with a
/// font's own layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutOverride {
    pub full: bool,
    pub fitting: bool,
    pub smushing: bool,
    /// Specific horizontal rule bits to smush with. `None` (or `Some(0)`)
    /// means "use the font's own rules", falling back to all six if the
    /// font doesn't have any either.
    pub rules: Option<u8>,
}

/// Validates a [`LayoutOverride`] and merges it with a font's own
/// (already-normalized) layout, implementing the "smushing without rule
/// bits inherits the font's rules, or all six otherwise" compatibility
/// rule from the format spec.
pub fn merge_layout_override(
    font_layout: &NormalizedLayout,
    requested: &LayoutOverride,
) -> Result<NormalizedLayout, LayoutError> {
    let selected = requested.full as u8 + requested.fitting as u8 + requested.smushing as u8;
    if selected != 1 {
        return Err(LayoutError::ConflictingFittingModes { selected });
    }

    let horizontal = if requested.full {
        HorizontalLayout::Full
    } else if requested.fitting {
        HorizontalLayout::Fitting
    } else {
        let rules = match requested.rules {
            Some(r) if r != 0 => r,
            _ => match font_layout.horizontal {
                HorizontalLayout::SmushingControlled { rules } if rules != 0 => rules,
                _ => ALL_HORIZONTAL_RULES,
            },
        };
        HorizontalLayout::SmushingControlled { rules }
    };

    Ok(NormalizedLayout {
        horizontal,
        vertical: font_layout.vertical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_layout_universal() {
        let l = normalize_layout(-3, None).unwrap();
        assert_eq!(l.horizontal, HorizontalLayout::SmushingUniversal);
        assert_eq!(l.vertical, VerticalLayout::Full);
    }

    #[test]
    fn old_layout_fitting() {
        assert_eq!(
            normalize_layout(-2, None).unwrap().horizontal,
            HorizontalLayout::Fitting
        );
        assert_eq!(
            normalize_layout(0, None).unwrap().horizontal,
            HorizontalLayout::Fitting
        );
    }

    #[test]
    fn old_layout_full() {
        assert_eq!(
            normalize_layout(-1, None).unwrap().horizontal,
            HorizontalLayout::Full
        );
    }

    #[test]
    fn old_layout_controlled() {
        let l = normalize_layout(15, None).unwrap();
        assert_eq!(
            l.horizontal,
            HorizontalLayout::SmushingControlled { rules: 15 }
        );
    }

    #[test]
    fn old_layout_out_of_range() {
        assert!(normalize_layout(64, None).is_err());
        assert!(normalize_layout(-4, None).is_err());
    }

    #[test]
    fn full_layout_precedence_over_old() {
        // old_layout says Full (-1), but full_layout is present and wins
        // entirely; with neither its fitting nor smushing bit set, it
        // resolves to Full by its own rules, not old_layout's Full.
        let l = normalize_layout(-1, Some(0b0000_0001)).unwrap();
        assert_eq!(l.horizontal, HorizontalLayout::Full);
    }

    #[test]
    fn full_layout_smushing_with_rules() {
        // bit 7 (smushing) + bit 0 (rule 1)
        let bits = (1 << 7) | 0b1;
        let l = normalize_layout(-1, Some(bits)).unwrap();
        assert_eq!(
            l.horizontal,
            HorizontalLayout::SmushingControlled { rules: 1 }
        );
    }

    #[test]
    fn full_layout_smushing_without_rules_is_universal() {
        let bits = 1 << 7;
        let l = normalize_layout(0, Some(bits)).unwrap();
        assert_eq!(l.horizontal, HorizontalLayout::SmushingUniversal);
    }

    #[test]
    fn full_layout_smushing_beats_fitting_when_both_set() {
        let bits = (1 << 6) | (1 << 7) | 0b10;
        let l = normalize_layout(0, Some(bits)).unwrap();
        assert_eq!(
            l.horizontal,
            HorizontalLayout::SmushingControlled { rules: 0b10 }
        );
    }

    #[test]
    fn merge_override_rejects_conflicting_modes() {
        let font_layout = NormalizedLayout {
            horizontal: HorizontalLayout::Full,
            vertical: VerticalLayout::Full,
        };
        let req = LayoutOverride {
            full: true,
            fitting: true,
            ..Default::default()
        };
        assert!(merge_layout_override(&font_layout, &req).is_err());
    }

    #[test]
    fn merge_override_inherits_font_rules() {
        let font_layout = NormalizedLayout {
            horizontal: HorizontalLayout::SmushingControlled { rules: 0b101 },
            vertical: VerticalLayout::Full,
        };
        let req = LayoutOverride {
            smushing: true,
            ..Default::default()
        };
        let merged = merge_layout_override(&font_layout, &req).unwrap();
        assert_eq!(
            merged.horizontal,
            HorizontalLayout::SmushingControlled { rules: 0b101 }
        );
    }

    #[test]
    fn merge_override_defaults_to_all_rules() {
        let font_layout = NormalizedLayout {
            horizontal: HorizontalLayout::Fitting,
            vertical: VerticalLayout::Full,
        };
        let req = LayoutOverride {
            smushing: true,
            ..Default::default()
        };
        let merged = merge_layout_override(&font_layout, &req).unwrap();
        assert_eq!(
            merged.horizontal,
            HorizontalLayout::SmushingControlled {
                rules: ALL_HORIZONTAL_RULES
            }
        );
    }
}
