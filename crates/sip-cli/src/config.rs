//! CLI configuration
//!
//! ```toml
//! [taste]
//! top_drinks_per_category = 3
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) taste: TasteConfig,
}

/// Taste report settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TasteConfig {
    /// Drinks listed per category in signature output; 0 hides the section
    pub(crate) top_drinks_per_category: usize,
}

impl Default for TasteConfig {
    fn default() -> Self {
        Self {
            top_drinks_per_category: 3,
        }
    }
}

impl CliConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&input).with_context(|| format!("parsing config {}", path.display()))
    }
}
