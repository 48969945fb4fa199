//! Configuration for the social layer
//!
//! ```toml
//! [cache]
//! max_capacity = 1000
//! time_to_live_secs = 300
//! ```
//!
//! Top-level `reconcile_after_commit = false` keeps the optimistic view after
//! a successful write instead of re-fetching the batch.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Social layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Re-fetch the batch after every committed toggle
    pub reconcile_after_commit: bool,
    /// View cache settings
    pub cache: CacheConfig,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            reconcile_after_commit: true,
            cache: CacheConfig::default(),
        }
    }
}

impl SocialConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, max_capacity: u64) -> Self {
        self.cache.max_capacity = max_capacity;
        self
    }

    /// With cache entry lifetime; zero disables expiry
    #[inline]
    #[must_use]
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache.time_to_live_secs = secs;
        self
    }

    /// With post-commit reconciliation on or off
    #[inline]
    #[must_use]
    pub fn with_reconcile_after_commit(mut self, enabled: bool) -> Self {
        self.reconcile_after_commit = enabled;
        self
    }

    /// Parse TOML; missing keys take defaults
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&input)
    }
}

/// View cache configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached batch views
    pub max_capacity: u64,
    /// Entry lifetime in seconds; 0 disables expiry
    pub time_to_live_secs: u64,
}

impl CacheConfig {
    /// Entry lifetime, if any
    #[inline]
    #[must_use]
    pub fn time_to_live(&self) -> Option<Duration> {
        (self.time_to_live_secs > 0).then(|| Duration::from_secs(self.time_to_live_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            time_to_live_secs: 300,
        }
    }
}
