//! Remote data store interfaces
//!
//! The coordinator and services only talk to the backend through these
//! traits. Implementations own transport, retries and timeouts; any failure
//! comes back as a [`StoreError`].

use crate::error::StoreError;
use crate::types::{ActivityId, LikeRow, PublicProfile, UserId};
use async_trait::async_trait;
use sip_taste::CustomDrinkType;

/// Access to the activity like relation and public profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// All like rows whose activity is in `activity_ids`
    async fn fetch_like_rows(&self, activity_ids: &[ActivityId])
        -> Result<Vec<LikeRow>, StoreError>;

    /// Insert the pair; a duplicate pair fails with [`StoreError::Conflict`]
    async fn insert_like(&self, activity_id: &ActivityId, user_id: &UserId)
        -> Result<(), StoreError>;

    /// Delete the pair
    async fn delete_like(&self, activity_id: &ActivityId, user_id: &UserId)
        -> Result<(), StoreError>;

    /// Users who liked the activity, most recent like first
    async fn fetch_liker_ids(&self, activity_id: &ActivityId) -> Result<Vec<UserId>, StoreError>;

    /// Public profiles of the given users, in no particular order
    async fn fetch_public_profiles(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<PublicProfile>, StoreError>;
}

/// New custom drink type, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomType {
    /// Display name
    pub name: String,
    /// Emoji icon
    pub icon: String,
    /// Hex color
    pub color: String,
}

/// Partial update of a custom drink type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTypeUpdate {
    /// New name
    pub name: Option<String>,
    /// New icon
    pub icon: Option<String>,
    /// New color
    pub color: Option<String>,
}

impl CustomTypeUpdate {
    /// Whether the update changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none() && self.color.is_none()
    }
}

/// Access to user-defined drink types, always scoped to their owner
#[async_trait]
pub trait CustomTypeStore: Send + Sync {
    /// Types owned by `owner`, oldest first
    async fn fetch_custom_types(&self, owner: &UserId)
        -> Result<Vec<CustomDrinkType>, StoreError>;

    /// Create a type
    async fn insert_custom_type(
        &self,
        owner: &UserId,
        draft: NewCustomType,
    ) -> Result<CustomDrinkType, StoreError>;

    /// Apply a partial update; fails with [`StoreError::NotFound`] for foreign or missing ids
    async fn update_custom_type(
        &self,
        id: &str,
        owner: &UserId,
        update: &CustomTypeUpdate,
    ) -> Result<CustomDrinkType, StoreError>;

    /// Delete a type
    async fn delete_custom_type(&self, id: &str, owner: &UserId) -> Result<(), StoreError>;
}
