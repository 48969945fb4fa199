//! Drink categories
//!
//! A category is either one of the built-in kinds or a user-defined custom
//! type identified by its name. Presentation details (icon, label, color) are
//! resolved by matching on the variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon used for custom categories without a matching definition
pub const DEFAULT_CUSTOM_ICON: &str = "🍹";

/// Color assigned to newly created custom types
pub const DEFAULT_CUSTOM_COLOR: &str = "#8B5CF6";

/// Theme color token for custom categories without a color of their own
pub const PRIMARY_COLOR_TOKEN: &str = "primary";

/// Built-in drink kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuiltInCategory {
    /// Whiskey and other spirits served neat
    Whiskey,
    /// Beer
    Beer,
    /// Wine
    Wine,
    /// Mixed drinks
    Cocktail,
    /// Anything else
    Other,
}

impl BuiltInCategory {
    /// All built-in categories in display order
    pub const ALL: [BuiltInCategory; 5] = [
        BuiltInCategory::Whiskey,
        BuiltInCategory::Beer,
        BuiltInCategory::Wine,
        BuiltInCategory::Cocktail,
        BuiltInCategory::Other,
    ];

    /// Stored identifier
    #[inline]
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            BuiltInCategory::Whiskey => "whiskey",
            BuiltInCategory::Beer => "beer",
            BuiltInCategory::Wine => "wine",
            BuiltInCategory::Cocktail => "cocktail",
            BuiltInCategory::Other => "other",
        }
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BuiltInCategory::Whiskey => "Whiskey",
            BuiltInCategory::Beer => "Beer",
            BuiltInCategory::Wine => "Wine",
            BuiltInCategory::Cocktail => "Cocktail",
            BuiltInCategory::Other => "Other",
        }
    }

    /// Emoji icon
    #[inline]
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            BuiltInCategory::Whiskey => "🥃",
            BuiltInCategory::Beer => "🍺",
            BuiltInCategory::Wine => "🍷",
            BuiltInCategory::Cocktail => "🍸",
            BuiltInCategory::Other => "🍹",
        }
    }

    /// Look up a built-in category by identifier (exact match)
    #[must_use]
    pub fn from_identifier(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.identifier() == id)
    }
}

/// User-defined drink type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDrinkType {
    /// Store identifier
    pub id: String,
    /// Display name, also the category identifier of drinks using it
    pub name: String,
    /// Emoji icon
    pub icon: String,
    /// Hex color
    pub color: String,
}

impl CustomDrinkType {
    /// Create custom type with default icon and color
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: DEFAULT_CUSTOM_ICON.to_string(),
            color: DEFAULT_CUSTOM_COLOR.to_string(),
        }
    }
}

/// Resolved presentation of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    /// Emoji icon
    pub icon: String,
    /// Display label
    pub label: String,
    /// Theme token or hex color
    pub color: String,
}

/// Category of a logged drink
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrinkCategory {
    /// One of the built-in kinds
    BuiltIn(BuiltInCategory),
    /// User-defined category, by name
    Custom(String),
}

impl DrinkCategory {
    /// Classify an identifier
    #[must_use]
    pub fn parse(id: &str) -> Self {
        match BuiltInCategory::from_identifier(id) {
            Some(builtin) => DrinkCategory::BuiltIn(builtin),
            None => DrinkCategory::Custom(id.to_string()),
        }
    }

    /// Raw identifier
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            DrinkCategory::BuiltIn(builtin) => builtin.identifier(),
            DrinkCategory::Custom(name) => name,
        }
    }

    /// Whether this is a built-in kind
    #[inline]
    #[must_use]
    pub fn is_built_in(&self) -> bool {
        matches!(self, DrinkCategory::BuiltIn(_))
    }

    /// Resolve icon, label and color.
    ///
    /// Custom categories take icon and color from the first definition in
    /// `custom_types` whose name matches.
    #[must_use]
    pub fn appearance(&self, custom_types: &[CustomDrinkType]) -> Appearance {
        match self {
            DrinkCategory::BuiltIn(builtin) => Appearance {
                icon: builtin.icon().to_string(),
                label: builtin.label().to_string(),
                color: builtin.identifier().to_string(),
            },
            DrinkCategory::Custom(name) => {
                let definition = custom_types.iter().find(|t| &t.name == name);
                Appearance {
                    icon: definition
                        .map_or(DEFAULT_CUSTOM_ICON, |t| t.icon.as_str())
                        .to_string(),
                    label: name.clone(),
                    color: definition
                        .map_or(PRIMARY_COLOR_TOKEN, |t| t.color.as_str())
                        .to_string(),
                }
            }
        }
    }
}

impl From<BuiltInCategory> for DrinkCategory {
    fn from(builtin: BuiltInCategory) -> Self {
        DrinkCategory::BuiltIn(builtin)
    }
}

impl From<String> for DrinkCategory {
    fn from(id: String) -> Self {
        match BuiltInCategory::from_identifier(&id) {
            Some(builtin) => DrinkCategory::BuiltIn(builtin),
            None => DrinkCategory::Custom(id),
        }
    }
}

impl From<&str> for DrinkCategory {
    fn from(id: &str) -> Self {
        Self::parse(id)
    }
}

impl From<DrinkCategory> for String {
    fn from(category: DrinkCategory) -> Self {
        match category {
            DrinkCategory::BuiltIn(builtin) => builtin.identifier().to_string(),
            DrinkCategory::Custom(name) => name,
        }
    }
}

impl fmt::Display for DrinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
