//! Testing utilities for the Sipline workspace
//!
//! In-memory stores with failure injection, call counters and a write gate
//! for holding toggles in flight.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use sip_social::{
    ActivityId, ActivityVisibility, CustomTypeStore, CustomTypeUpdate, LikeRow, LikeStore,
    NewCustomType, PublicProfile, StoreError, UserId,
};
use sip_taste::{CustomDrinkType, DrinkLogEntry};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

#[derive(Debug, Clone)]
struct StoredLike {
    activity_id: ActivityId,
    user_id: UserId,
    seq: u64,
}

#[derive(Debug, Default)]
struct LikeTable {
    likes: Vec<StoredLike>,
    profiles: HashMap<UserId, PublicProfile>,
    next_seq: u64,
}

impl LikeTable {
    fn contains(&self, activity_id: &ActivityId, user_id: &UserId) -> bool {
        self.likes
            .iter()
            .any(|l| &l.activity_id == activity_id && &l.user_id == user_id)
    }

    fn insert(&mut self, activity_id: &ActivityId, user_id: &UserId) -> Result<(), StoreError> {
        if self.contains(activity_id, user_id) {
            return Err(StoreError::Conflict(format!(
                "duplicate like ({activity_id}, {user_id})"
            )));
        }
        self.next_seq += 1;
        self.likes.push(StoredLike {
            activity_id: activity_id.clone(),
            user_id: user_id.clone(),
            seq: self.next_seq,
        });
        Ok(())
    }
}

/// Number of calls per store operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch_like_rows: usize,
    pub insert_like: usize,
    pub delete_like: usize,
    pub fetch_liker_ids: usize,
    pub fetch_public_profiles: usize,
}

#[derive(Debug, Default)]
struct Counters {
    fetch_like_rows: AtomicUsize,
    insert_like: AtomicUsize,
    delete_like: AtomicUsize,
    fetch_liker_ids: AtomicUsize,
    fetch_public_profiles: AtomicUsize,
}

/// In-memory like relation with injectable failures
#[derive(Debug)]
pub struct MemoryLikeStore {
    table: Mutex<LikeTable>,
    counters: Counters,
    next_read_error: Mutex<Option<StoreError>>,
    write_errors: Mutex<VecDeque<StoreError>>,
    writes_paused: watch::Sender<bool>,
}

impl Default for MemoryLikeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLikeStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(LikeTable::default()),
            counters: Counters::default(),
            next_read_error: Mutex::new(None),
            write_errors: Mutex::new(VecDeque::new()),
            writes_paused: watch::channel(false).0,
        }
    }

    /// Store seeded with (activity, user) pairs, oldest first
    pub fn with_likes(pairs: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (activity_id, user_id) in pairs {
            store.add_like(activity_id, user_id);
        }
        store
    }

    /// Insert a like directly, as another session would
    pub fn add_like(&self, activity_id: &str, user_id: &str) {
        let _ = self
            .table
            .lock()
            .insert(&ActivityId::from(activity_id), &UserId::from(user_id));
    }

    /// Remove a like directly, as another session would
    pub fn remove_like(&self, activity_id: &str, user_id: &str) {
        self.table
            .lock()
            .likes
            .retain(|l| !(l.activity_id.as_str() == activity_id && l.user_id.as_str() == user_id));
    }

    pub fn add_profile(&self, profile: PublicProfile) {
        self.table
            .lock()
            .profiles
            .insert(profile.user_id.clone(), profile);
    }

    pub fn has_like(&self, activity_id: &str, user_id: &str) -> bool {
        self.table
            .lock()
            .contains(&ActivityId::from(activity_id), &UserId::from(user_id))
    }

    /// Fail the next read with `err`
    pub fn fail_next_read(&self, err: StoreError) {
        *self.next_read_error.lock() = Some(err);
    }

    /// Fail the next insert or delete with `err`.
    ///
    /// Calls queue up: each one fails one more write, in order.
    pub fn fail_next_write(&self, err: StoreError) {
        self.write_errors.lock().push_back(err);
    }

    /// Hold inserts and deletes until [`resume_writes`](Self::resume_writes)
    pub fn pause_writes(&self) {
        self.writes_paused.send_replace(true);
    }

    pub fn resume_writes(&self) {
        self.writes_paused.send_replace(false);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            fetch_like_rows: self.counters.fetch_like_rows.load(Ordering::SeqCst),
            insert_like: self.counters.insert_like.load(Ordering::SeqCst),
            delete_like: self.counters.delete_like.load(Ordering::SeqCst),
            fetch_liker_ids: self.counters.fetch_liker_ids.load(Ordering::SeqCst),
            fetch_public_profiles: self.counters.fetch_public_profiles.load(Ordering::SeqCst),
        }
    }

    fn take_read_error(&self) -> Result<(), StoreError> {
        match self.next_read_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn admit_write(&self) -> Result<(), StoreError> {
        let mut paused = self.writes_paused.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = paused.wait_for(|paused| !*paused).await;

        match self.write_errors.lock().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LikeStore for MemoryLikeStore {
    async fn fetch_like_rows(&self, activity_ids: &[ActivityId]) -> Result<Vec<LikeRow>, StoreError> {
        self.counters.fetch_like_rows.fetch_add(1, Ordering::SeqCst);
        self.take_read_error()?;

        Ok(self
            .table
            .lock()
            .likes
            .iter()
            .filter(|l| activity_ids.contains(&l.activity_id))
            .map(|l| LikeRow {
                activity_id: l.activity_id.clone(),
                user_id: l.user_id.clone(),
            })
            .collect())
    }

    async fn insert_like(&self, activity_id: &ActivityId, user_id: &UserId) -> Result<(), StoreError> {
        self.counters.insert_like.fetch_add(1, Ordering::SeqCst);
        self.admit_write().await?;
        self.table.lock().insert(activity_id, user_id)
    }

    async fn delete_like(&self, activity_id: &ActivityId, user_id: &UserId) -> Result<(), StoreError> {
        self.counters.delete_like.fetch_add(1, Ordering::SeqCst);
        self.admit_write().await?;
        self.table
            .lock()
            .likes
            .retain(|l| !(&l.activity_id == activity_id && &l.user_id == user_id));
        Ok(())
    }

    async fn fetch_liker_ids(&self, activity_id: &ActivityId) -> Result<Vec<UserId>, StoreError> {
        self.counters.fetch_liker_ids.fetch_add(1, Ordering::SeqCst);
        self.take_read_error()?;

        let table = self.table.lock();
        let mut likes: Vec<&StoredLike> = table
            .likes
            .iter()
            .filter(|l| &l.activity_id == activity_id)
            .collect();
        likes.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(likes.into_iter().map(|l| l.user_id.clone()).collect())
    }

    async fn fetch_public_profiles(&self, user_ids: &[UserId]) -> Result<Vec<PublicProfile>, StoreError> {
        self.counters.fetch_public_profiles.fetch_add(1, Ordering::SeqCst);
        self.take_read_error()?;

        // Sorted by user id, unrelated to like order
        let table = self.table.lock();
        let mut profiles: Vec<PublicProfile> = user_ids
            .iter()
            .filter_map(|id| table.profiles.get(id).cloned())
            .collect();
        profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(profiles)
    }
}

/// In-memory custom drink types keyed by owner
#[derive(Debug, Default)]
pub struct MemoryCustomTypeStore {
    rows: Mutex<Vec<(UserId, CustomDrinkType)>>,
}

impl MemoryCustomTypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl CustomTypeStore for MemoryCustomTypeStore {
    async fn fetch_custom_types(&self, owner: &UserId) -> Result<Vec<CustomDrinkType>, StoreError> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|(o, _)| o == owner)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn insert_custom_type(
        &self,
        owner: &UserId,
        draft: NewCustomType,
    ) -> Result<CustomDrinkType, StoreError> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|(o, t)| o == owner && t.name == draft.name) {
            return Err(StoreError::Conflict(format!("custom type {} exists", draft.name)));
        }

        let created = CustomDrinkType {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            icon: draft.icon,
            color: draft.color,
        };
        rows.push((owner.clone(), created.clone()));
        Ok(created)
    }

    async fn update_custom_type(
        &self,
        id: &str,
        owner: &UserId,
        update: &CustomTypeUpdate,
    ) -> Result<CustomDrinkType, StoreError> {
        let mut rows = self.rows.lock();
        let (_, existing) = rows
            .iter_mut()
            .find(|(o, t)| o == owner && t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("custom type {id}")))?;

        if let Some(name) = &update.name {
            existing.name.clone_from(name);
        }
        if let Some(icon) = &update.icon {
            existing.icon.clone_from(icon);
        }
        if let Some(color) = &update.color {
            existing.color.clone_from(color);
        }
        Ok(existing.clone())
    }

    async fn delete_custom_type(&self, id: &str, owner: &UserId) -> Result<(), StoreError> {
        self.rows.lock().retain(|(o, t)| !(o == owner && t.id == id));
        Ok(())
    }
}

/// Public profile fixture
pub fn profile(user_id: &str) -> PublicProfile {
    PublicProfile {
        user_id: UserId::from(user_id),
        username: Some(user_id.to_string()),
        display_name: Some(format!("User {user_id}")),
        avatar_url: None,
        bio: None,
        is_public: true,
        activity_visibility: ActivityVisibility::Public,
        created_at: Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

/// Drink log fixture: three wines, one beer, one whiskey
pub fn sample_log() -> Vec<DrinkLogEntry> {
    vec![
        DrinkLogEntry::new("d1", "Barolo", "wine", 4.5),
        DrinkLogEntry::new("d2", "Chianti", "wine", 4.0),
        DrinkLogEntry::new("d3", "Vinho Verde", "wine", 0.0),
        DrinkLogEntry::new("d4", "Saison", "beer", 3.5),
        DrinkLogEntry::new("d5", "Talisker 10", "whiskey", 5.0),
    ]
}
