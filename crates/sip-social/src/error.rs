//! Error types for social operations
//!
//! Provides error handling for:
//! - Remote store failures (the only kind surfaced by reads and writes)
//! - Failed like toggles, after the local view has been rolled back
//! - Toggle state machine violations
//! - Configuration loading

use crate::toggle::ToggleState;
use crate::types::ActivityId;
use std::path::PathBuf;

/// Failure reported by the remote data store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Network or transport failure, including timeouts
    #[error("transport failure: {0}")]
    Transport(String),

    /// Uniqueness or other constraint violation
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not allowed to perform the operation
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Backend rejected the request
    #[error("rejected: {0}")]
    Rejected(String),

    /// Addressed row does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Check if this is a constraint conflict (e.g. duplicate like)
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if retrying the same request could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// A like toggle failed and its optimistic change was reverted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("toggling like on activity {activity_id} failed: {source}")]
pub struct ToggleError {
    /// Activity whose toggle failed
    pub activity_id: ActivityId,
    /// Underlying store failure
    #[source]
    pub source: StoreError,
}

impl ToggleError {
    /// Create toggle error
    #[inline]
    #[must_use]
    pub fn new(activity_id: ActivityId, source: StoreError) -> Self {
        Self { activity_id, source }
    }
}

/// Illegal toggle state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal toggle transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    /// State before the attempted transition
    pub from: ToggleState,
    /// Requested state
    pub to: ToggleState,
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
