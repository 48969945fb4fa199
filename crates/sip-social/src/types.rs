//! Core types for activity likes
//!
//! Defines:
//! - Activity and user identifiers
//! - Per-activity like state and the batch view the coordinator caches
//! - Rows and profiles returned by the remote store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque activity identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub String);

impl ActivityId {
    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActivityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActivityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque user identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Like state of one activity as seen by the viewing user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLikeInfo {
    /// Number of users who liked the activity
    pub count: u32,
    /// Whether the viewing user is among them
    pub is_liked_by_me: bool,
}

impl ActivityLikeInfo {
    /// Create like info
    #[inline]
    #[must_use]
    pub fn new(count: u32, is_liked_by_me: bool) -> Self {
        Self {
            count,
            is_liked_by_me,
        }
    }
}

/// Like state for every activity of a batch
///
/// Always total over the batch: every requested activity has an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikesView {
    entries: BTreeMap<ActivityId, ActivityLikeInfo>,
}

impl LikesView {
    /// View with every activity at zero likes
    #[must_use]
    pub fn zeroed<'a>(activity_ids: impl IntoIterator<Item = &'a ActivityId>) -> Self {
        Self {
            entries: activity_ids
                .into_iter()
                .map(|id| (id.clone(), ActivityLikeInfo::default()))
                .collect(),
        }
    }

    /// Fold one like row into the view.
    ///
    /// Rows for activities outside the view are ignored.
    pub fn record(&mut self, row: &LikeRow, viewer: &UserId) {
        if let Some(info) = self.entries.get_mut(&row.activity_id) {
            info.count += 1;
            if &row.user_id == viewer {
                info.is_liked_by_me = true;
            }
        }
    }

    /// Like info for an activity
    #[inline]
    #[must_use]
    pub fn get(&self, activity_id: &ActivityId) -> Option<&ActivityLikeInfo> {
        self.entries.get(activity_id)
    }

    /// Mutable like info for an activity
    #[inline]
    pub fn get_mut(&mut self, activity_id: &ActivityId) -> Option<&mut ActivityLikeInfo> {
        self.entries.get_mut(activity_id)
    }

    /// Iterate entries in activity id order
    pub fn iter(&self) -> impl Iterator<Item = (&ActivityId, &ActivityLikeInfo)> {
        self.entries.iter()
    }

    /// Number of activities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the view covers no activities
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key of a batch: the sorted, de-duplicated activity ids
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey(Vec<ActivityId>);

impl BatchKey {
    /// Create key from activity ids in any order
    #[must_use]
    pub fn new(activity_ids: impl IntoIterator<Item = ActivityId>) -> Self {
        let mut ids: Vec<ActivityId> = activity_ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self(ids)
    }

    /// Activity ids of the batch
    #[inline]
    #[must_use]
    pub fn activity_ids(&self) -> &[ActivityId] {
        &self.0
    }
}

/// One (activity, user) like pair from the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeRow {
    /// Liked activity
    pub activity_id: ActivityId,
    /// Liking user
    pub user_id: UserId,
}

impl LikeRow {
    /// Create like row
    #[must_use]
    pub fn new(activity_id: impl Into<ActivityId>, user_id: impl Into<UserId>) -> Self {
        Self {
            activity_id: activity_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Who may see a user's activity feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityVisibility {
    /// Anyone
    #[default]
    Public,
    /// Accepted followers only
    Friends,
    /// Nobody but the owner
    Private,
}

/// Publicly visible profile summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Owner
    pub user_id: UserId,
    /// Unique handle
    pub username: Option<String>,
    /// Display name
    pub display_name: Option<String>,
    /// Avatar location
    pub avatar_url: Option<String>,
    /// Short biography
    pub bio: Option<String>,
    /// Whether the profile is listed publicly
    pub is_public: bool,
    /// Feed visibility
    pub activity_visibility: ActivityVisibility,
    /// Profile creation time
    pub created_at: DateTime<Utc>,
}

/// Like state after a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    /// Whether the pair now exists
    pub is_liked: bool,
}
