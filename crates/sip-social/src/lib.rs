//! Sipline Social
//!
//! Activity likes with immediate local feedback.
//!
//! # Core Concepts
//!
//! - [`LikeStore`]: remote like relation and public profiles
//! - [`ViewCache`]: injectable cache with snapshot/restore, [`MokaViewCache`] by default
//! - [`LikeCoordinator`]: optimistic toggle with rollback and reconciliation
//! - [`CustomTypeService`]: user-defined drink types
//!
//! # Architecture
//!
//! ```text
//! UI ─ toggle ─> LikeCoordinator ─ snapshot/mutate ─> ViewCache
//!                      │                                 ↑
//!                      └─ insert/delete ─> LikeStore ─ re-fetch / restore
//! ```
//!
//! # Example
//!
//! ```rust
//! use sip_social::{ActivityId, ActivityLikeInfo, BatchKey, LikeCoordinator, LikesView, MokaViewCache, UserId};
//! use sip_test_utils::MemoryLikeStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryLikeStore::with_likes(&[("a1", "friend")]));
//! let coordinator = LikeCoordinator::new(
//!     store,
//!     MokaViewCache::<BatchKey, LikesView>::default(),
//!     [ActivityId::from("a1"), ActivityId::from("a2")],
//!     UserId::from("me"),
//! );
//! coordinator.load().await?;
//!
//! let a1 = ActivityId::from("a1");
//! let liked = coordinator.like_info(&a1).is_liked_by_me;
//! coordinator.toggle(&a1, liked).await?;
//! assert_eq!(coordinator.like_info(&a1), ActivityLikeInfo::new(2, true));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod custom_types;
pub mod error;
pub mod service;
pub mod store;
pub mod toggle;
pub mod types;

// Re-exports for convenience
pub use cache::{CacheStats, MokaViewCache, Snapshot, ViewCache};
pub use config::{CacheConfig, SocialConfig};
pub use coordinator::{LikeCoordinator, ToggleOutcome};
pub use custom_types::CustomTypeService;
pub use error::{ConfigError, StoreError, ToggleError, TransitionError};
pub use service::{fetch_liked_by_users, fetch_likes_for_activities, toggle_like};
pub use store::{CustomTypeStore, CustomTypeUpdate, LikeStore, NewCustomType};
pub use toggle::{allowed_transitions, validate_transition, ToggleDirection, ToggleOp, ToggleState};
pub use types::{
    ActivityId, ActivityLikeInfo, ActivityVisibility, BatchKey, LikeRow, LikeState, LikesView,
    PublicProfile, UserId,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with likes
    pub use crate::{
        ActivityId, ActivityLikeInfo, LikeCoordinator, LikeStore, MokaViewCache, StoreError,
        ToggleError, UserId, ViewCache,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
