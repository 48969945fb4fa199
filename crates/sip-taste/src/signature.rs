//! Taste signature: per-category breakdown of a drink log
//!
//! The breakdown is a derived view. It is recomputed from the log whenever the
//! log changes and carries no identity of its own.

use crate::category::DrinkCategory;
use crate::label::compute_personality_label;
use serde::{Deserialize, Serialize};

/// One logged drink, as far as taste aggregation is concerned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkLogEntry {
    /// Drink identifier
    pub id: String,
    /// Drink name
    pub name: String,
    /// Category
    #[serde(rename = "type")]
    pub category: DrinkCategory,
    /// Rating from 0 to 5; 0 means unrated
    #[serde(default)]
    pub rating: f64,
    /// Photo location
    #[serde(default)]
    pub image_url: Option<String>,
    /// Brand or producer
    #[serde(default)]
    pub brand: Option<String>,
}

impl DrinkLogEntry {
    /// Create entry without image or brand
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<DrinkCategory>,
        rating: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            rating,
            image_url: None,
            brand: None,
        }
    }

    #[inline]
    fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}

/// One category's share of a drink log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteBreakdownItem {
    /// Category
    #[serde(rename = "type")]
    pub category: DrinkCategory,
    /// Number of drinks in this category
    pub count: u32,
    /// Share of all drinks, 0 to 100
    pub percentage: f64,
    /// Average rating, 0 to 5
    pub avg_rating: f64,
}

impl TasteBreakdownItem {
    /// Create breakdown item
    #[must_use]
    pub fn new(
        category: impl Into<DrinkCategory>,
        count: u32,
        percentage: f64,
        avg_rating: f64,
    ) -> Self {
        Self {
            category: category.into(),
            count,
            percentage,
            avg_rating,
        }
    }
}

/// Aggregated taste profile of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteSignature {
    /// Per-category breakdown
    pub breakdown: Vec<TasteBreakdownItem>,
    /// Total drinks across all categories
    pub total_drinks: u32,
    /// Derived label
    pub personality_label: String,
}

impl TasteSignature {
    /// Build signature from a precomputed breakdown
    #[must_use]
    pub fn from_breakdown(breakdown: Vec<TasteBreakdownItem>) -> Self {
        let total_drinks = breakdown.iter().map(|item| item.count).sum();
        let personality_label = compute_personality_label(&breakdown);
        Self {
            breakdown,
            total_drinks,
            personality_label,
        }
    }

    /// Build signature from a drink log
    #[must_use]
    pub fn from_entries(entries: &[DrinkLogEntry]) -> Self {
        Self::from_breakdown(aggregate_breakdown(entries))
    }

    /// Whether the log was empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }
}

/// Per-category accumulator, kept in first-seen order
#[derive(Debug)]
struct CategoryTally<'a> {
    category: &'a DrinkCategory,
    count: u32,
    rating_sum: f64,
    rated: u32,
}

fn tally(entries: &[DrinkLogEntry]) -> Vec<CategoryTally<'_>> {
    let mut tallies: Vec<CategoryTally<'_>> = Vec::new();

    for entry in entries {
        let idx = match tallies.iter().position(|t| t.category == &entry.category) {
            Some(idx) => idx,
            None => {
                tallies.push(CategoryTally {
                    category: &entry.category,
                    count: 0,
                    rating_sum: 0.0,
                    rated: 0,
                });
                tallies.len() - 1
            }
        };

        let t = &mut tallies[idx];
        t.count += 1;
        if entry.is_rated() {
            t.rating_sum += entry.rating;
            t.rated += 1;
        }
    }

    // Stable: equal counts keep first-seen order
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

/// Group a drink log by category.
///
/// Items are ordered by count, descending, with ties in first-seen order.
/// Percentages are whole numbers; average ratings ignore unrated drinks and
/// are rounded to one decimal.
#[must_use]
pub fn aggregate_breakdown(entries: &[DrinkLogEntry]) -> Vec<TasteBreakdownItem> {
    let total = entries.len();
    if total == 0 {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let total = total as f64;

    tally(entries)
        .into_iter()
        .map(|t| {
            let percentage = (f64::from(t.count) * 100.0 / total).round();
            let avg_rating = if t.rated == 0 {
                0.0
            } else {
                (t.rating_sum / f64::from(t.rated) * 10.0).round() / 10.0
            };
            TasteBreakdownItem::new(t.category.clone(), t.count, percentage, avg_rating)
        })
        .collect()
}

/// Highest-rated drink of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDrinkEntry {
    /// Drink identifier
    pub id: String,
    /// Drink name
    pub name: String,
    /// Category
    #[serde(rename = "type")]
    pub category: DrinkCategory,
    /// Rating
    pub rating: f64,
    /// Photo location
    pub image_url: Option<String>,
    /// Brand or producer
    pub brand: Option<String>,
}

impl From<&DrinkLogEntry> for TopDrinkEntry {
    fn from(entry: &DrinkLogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            category: entry.category.clone(),
            rating: entry.rating,
            image_url: entry.image_url.clone(),
            brand: entry.brand.clone(),
        }
    }
}

/// Best drinks of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTopDrinks {
    /// Category
    #[serde(rename = "type")]
    pub category: DrinkCategory,
    /// Drinks, best first
    pub top_drinks: Vec<TopDrinkEntry>,
}

/// Pick the best rated drinks of each category.
///
/// Categories follow breakdown order. Unrated drinks are skipped and
/// categories left with nothing rated are omitted.
#[must_use]
pub fn top_drinks_by_category(
    entries: &[DrinkLogEntry],
    per_category: usize,
) -> Vec<CategoryTopDrinks> {
    if per_category == 0 {
        return Vec::new();
    }

    tally(entries)
        .into_iter()
        .filter_map(|t| {
            let mut rated: Vec<&DrinkLogEntry> = entries
                .iter()
                .filter(|e| &e.category == t.category && e.is_rated())
                .collect();
            if rated.is_empty() {
                return None;
            }

            rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            rated.truncate(per_category);

            Some(CategoryTopDrinks {
                category: t.category.clone(),
                top_drinks: rated.into_iter().map(TopDrinkEntry::from).collect(),
            })
        })
        .collect()
}
