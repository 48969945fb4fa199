//! Personality label classification
//!
//! Maps a taste breakdown to a short label:
//!
//! | Condition | Label |
//! |---|---|
//! | empty breakdown | `Newcomer` |
//! | top share `> 60` | `{Top} Devotee` |
//! | top two shares both `>= 30` | `{First} & {Second} Enthusiast` |
//! | otherwise | `Eclectic Sipper` |

use crate::signature::TasteBreakdownItem;

/// Label for a breakdown with no entries
pub const NEWCOMER: &str = "Newcomer";

/// Fallback label
pub const ECLECTIC_SIPPER: &str = "Eclectic Sipper";

/// Share a single category must exceed for a devotee label (exclusive)
pub const DEVOTEE_THRESHOLD: f64 = 60.0;

/// Share both leading categories must reach for an enthusiast label (inclusive)
pub const ENTHUSIAST_THRESHOLD: f64 = 30.0;

/// Uppercase the first character, leaving the rest untouched.
///
/// Uses Unicode case mapping only, so the output does not depend on the
/// process locale.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive the personality label for a breakdown.
///
/// Entries are ranked by percentage, descending. The sort is stable, so on
/// ties the entry seen first wins.
#[must_use]
pub fn compute_personality_label(breakdown: &[TasteBreakdownItem]) -> String {
    let mut ranked: Vec<&TasteBreakdownItem> = breakdown.iter().collect();
    ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let Some(top) = ranked.first() else {
        return NEWCOMER.to_string();
    };

    if top.percentage > DEVOTEE_THRESHOLD {
        return format!("{} Devotee", capitalize_first(top.category.identifier()));
    }

    if let Some(second) = ranked.get(1) {
        if top.percentage >= ENTHUSIAST_THRESHOLD && second.percentage >= ENTHUSIAST_THRESHOLD {
            return format!(
                "{} & {} Enthusiast",
                capitalize_first(top.category.identifier()),
                capitalize_first(second.category.identifier())
            );
        }
    }

    ECLECTIC_SIPPER.to_string()
}
