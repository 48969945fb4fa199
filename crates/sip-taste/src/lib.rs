//! Sipline Taste
//!
//! Pure computations over a user's drink log.
//!
//! # Overview
//!
//! - [`DrinkCategory`]: built-in kinds and user-defined custom types
//! - [`aggregate_breakdown`]: per-category counts, shares and average ratings
//! - [`compute_personality_label`]: short label derived from a breakdown
//! - [`TasteSignature`]: breakdown, total and label together
//!
//! # Example
//!
//! ```rust
//! use sip_taste::{DrinkLogEntry, TasteSignature};
//!
//! let log = vec![
//!     DrinkLogEntry::new("1", "Barolo", "wine", 4.5),
//!     DrinkLogEntry::new("2", "Chianti", "wine", 4.0),
//!     DrinkLogEntry::new("3", "Saison", "beer", 3.5),
//! ];
//!
//! let signature = TasteSignature::from_entries(&log);
//! assert_eq!(signature.total_drinks, 3);
//! assert_eq!(signature.personality_label, "Wine Devotee");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod category;
pub mod label;
pub mod signature;

// Re-exports
pub use category::{
    Appearance, BuiltInCategory, CustomDrinkType, DrinkCategory, DEFAULT_CUSTOM_COLOR,
    DEFAULT_CUSTOM_ICON,
};
pub use label::{capitalize_first, compute_personality_label};
pub use signature::{
    aggregate_breakdown, top_drinks_by_category, CategoryTopDrinks, DrinkLogEntry,
    TasteBreakdownItem, TasteSignature, TopDrinkEntry,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for taste computations
    pub use crate::{
        aggregate_breakdown, compute_personality_label, BuiltInCategory, DrinkCategory,
        DrinkLogEntry, TasteBreakdownItem, TasteSignature,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
