//! Optimistic like coordinator
//!
//! Owns the cached like view of one batch of activities for one viewing user
//! (typically the lifetime of one screen). Toggles are reflected in the view
//! before the remote write is issued:
//!
//! 1. Snapshot the batch view
//! 2. Apply the expected effect in place
//! 3. Write to the store
//! 4. On success re-fetch the batch and overwrite the view (unless
//!    reconciliation is turned off); on failure restore the snapshot and
//!    return [`ToggleError`]
//!
//! Steps 1 and 2 run without suspending, so any read after `toggle` starts
//! already sees the optimistic result. Overlapping toggles on the same pair
//! are not serialized and may settle in any order.
//!
//! A snapshot covers the whole batch. When another toggle touched the view
//! while a failed toggle was in flight, its snapshot may carry that toggle's
//! unconfirmed change, so the rollback is followed by a re-fetch.

use crate::cache::{MokaViewCache, ViewCache};
use crate::config::SocialConfig;
use crate::error::{StoreError, ToggleError};
use crate::service;
use crate::store::LikeStore;
use crate::toggle::{ToggleOp, ToggleState};
use crate::types::{ActivityId, ActivityLikeInfo, BatchKey, LikesView, UserId};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a settled toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Toggled activity
    pub activity_id: ActivityId,
    /// Whether the viewer likes the activity after the write
    pub is_liked: bool,
    /// Whether the view was overwritten with authoritative state
    pub reconciled: bool,
}

/// Counts a toggle as in flight until dropped
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Like view and toggle coordinator for one batch of activities
pub struct LikeCoordinator<S, C>
where
    S: LikeStore + ?Sized,
    C: ViewCache<BatchKey, LikesView>,
{
    store: Arc<S>,
    cache: C,
    viewer: UserId,
    key: BatchKey,
    pending: AtomicUsize,
    // Bumped on every write to the batch view
    version: AtomicU64,
    reconcile_after_commit: bool,
}

impl<S, C> LikeCoordinator<S, C>
where
    S: LikeStore + ?Sized,
    C: ViewCache<BatchKey, LikesView>,
{
    /// Create coordinator for `activity_ids` as seen by `viewer`.
    ///
    /// Nothing is fetched until [`load`](Self::load).
    pub fn new(
        store: Arc<S>,
        cache: C,
        activity_ids: impl IntoIterator<Item = ActivityId>,
        viewer: UserId,
    ) -> Self {
        Self {
            store,
            cache,
            viewer,
            key: BatchKey::new(activity_ids),
            pending: AtomicUsize::new(0),
            version: AtomicU64::new(0),
            reconcile_after_commit: true,
        }
    }

    /// Turn post-commit reconciliation on or off (on by default)
    #[must_use]
    pub fn with_reconciliation(mut self, enabled: bool) -> Self {
        self.reconcile_after_commit = enabled;
        self
    }

    /// Fetch authoritative state and replace the cached view.
    ///
    /// # Errors
    /// Any [`StoreError`] from the fetch; the cached view is left untouched.
    pub async fn load(&self) -> Result<LikesView, StoreError> {
        let view = service::fetch_likes_for_activities(
            &*self.store,
            self.key.activity_ids(),
            &self.viewer,
        )
        .await?;
        self.cache.put(self.key.clone(), view.clone());
        self.bump_version();
        Ok(view)
    }

    /// Cached view of the batch, if loaded
    #[must_use]
    pub fn view(&self) -> Option<LikesView> {
        self.cache.get(&self.key)
    }

    /// Like info for one activity; zero when unknown or not yet loaded
    #[must_use]
    pub fn like_info(&self, activity_id: &ActivityId) -> ActivityLikeInfo {
        self.cache
            .get(&self.key)
            .and_then(|view| view.get(activity_id).copied())
            .unwrap_or_default()
    }

    /// Toggle the viewer's like on `activity_id`.
    ///
    /// The optimistic change is visible as soon as this is called. It only
    /// applies when the view is loaded and contains the activity.
    ///
    /// # Errors
    /// [`ToggleError`] when the write fails; the view is restored to exactly
    /// what it was before the call.
    pub async fn toggle(
        &self,
        activity_id: &ActivityId,
        is_currently_liked: bool,
    ) -> Result<ToggleOutcome, ToggleError> {
        let mut op = ToggleOp::new(activity_id.clone(), self.viewer.clone(), is_currently_liked);
        step(&mut op, ToggleState::Pending);

        let shared_at_start = self.has_pending();
        let snapshot = self.cache.snapshot(&self.key);
        let direction = op.direction();
        self.cache.mutate(&self.key, |view| {
            if let Some(info) = view.get_mut(activity_id) {
                direction.apply(info);
            }
        });
        let applied = self.bump_version();

        let result = {
            let _pending = PendingGuard::enter(&self.pending);
            service::toggle_like(&*self.store, activity_id, &self.viewer, is_currently_liked)
                .await
        };

        match result {
            Ok(state) => {
                step(&mut op, ToggleState::Committed);
                info!(
                    activity_id = %activity_id,
                    user_id = %self.viewer,
                    is_liked = state.is_liked,
                    "like toggle committed"
                );

                let reconciled = self.reconcile_after_commit && self.reconcile().await;
                step(&mut op, ToggleState::Idle);

                Ok(ToggleOutcome {
                    activity_id: activity_id.clone(),
                    is_liked: state.is_liked,
                    reconciled,
                })
            }
            Err(source) => {
                let shared = shared_at_start
                    || self.has_pending()
                    || self.version.load(Ordering::SeqCst) != applied;
                self.cache.restore(self.key.clone(), snapshot);
                self.bump_version();
                step(&mut op, ToggleState::RolledBack);
                warn!(
                    activity_id = %activity_id,
                    user_id = %self.viewer,
                    error = %source,
                    shared,
                    "like toggle failed, rolled back"
                );

                if shared {
                    self.reconcile().await;
                }
                step(&mut op, ToggleState::Idle);

                Err(ToggleError::new(activity_id.clone(), source))
            }
        }
    }

    /// Switch to a different batch, discarding the current view.
    ///
    /// Call [`load`](Self::load) afterwards to populate the new batch.
    pub fn retarget(&mut self, activity_ids: impl IntoIterator<Item = ActivityId>) {
        let key = BatchKey::new(activity_ids);
        if key != self.key {
            self.cache.invalidate(&self.key);
            self.key = key;
        }
    }

    /// Number of toggles whose write has not settled
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Whether any toggle write is in flight
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Activity ids of the current batch, sorted
    #[inline]
    #[must_use]
    pub fn activity_ids(&self) -> &[ActivityId] {
        self.key.activity_ids()
    }

    /// Viewing user
    #[inline]
    #[must_use]
    pub fn viewer(&self) -> &UserId {
        &self.viewer
    }

    fn bump_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Overwrite the view with authoritative state; keeps the current view on failure
    async fn reconcile(&self) -> bool {
        match self.load().await {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    user_id = %self.viewer,
                    error = %err,
                    "reconciliation fetch failed, keeping current view"
                );
                false
            }
        }
    }
}

impl<S> LikeCoordinator<S, MokaViewCache<BatchKey, LikesView>>
where
    S: LikeStore + ?Sized,
{
    /// Create coordinator with a fresh cache built from `config`
    pub fn from_config(
        store: Arc<S>,
        config: &SocialConfig,
        activity_ids: impl IntoIterator<Item = ActivityId>,
        viewer: UserId,
    ) -> Self {
        Self::new(store, MokaViewCache::from_config(&config.cache), activity_ids, viewer)
            .with_reconciliation(config.reconcile_after_commit)
    }
}

impl<S, C> Drop for LikeCoordinator<S, C>
where
    S: LikeStore + ?Sized,
    C: ViewCache<BatchKey, LikesView>,
{
    fn drop(&mut self) {
        self.cache.invalidate(&self.key);
    }
}

fn step(op: &mut ToggleOp, to: ToggleState) {
    if let Err(err) = op.advance(to) {
        error!(activity_id = %op.activity_id(), error = %err, "toggle state machine violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockLikeStore;
    use crate::types::LikeRow;

    type Cache = MokaViewCache<BatchKey, LikesView>;

    fn rows(n_others: usize, viewer_likes: bool) -> Vec<LikeRow> {
        let mut rows: Vec<LikeRow> = (0..n_others)
            .map(|i| LikeRow::new("a", format!("other{i}")))
            .collect();
        if viewer_likes {
            rows.push(LikeRow::new("a", "me"));
        }
        rows
    }

    fn coordinator(store: MockLikeStore, cache: Cache) -> LikeCoordinator<MockLikeStore, Cache> {
        LikeCoordinator::new(
            Arc::new(store),
            cache,
            [ActivityId::from("a"), ActivityId::from("b")],
            UserId::from("me"),
        )
    }

    #[tokio::test]
    async fn like_info_defaults_before_load() {
        let store = MockLikeStore::new();
        let coordinator = coordinator(store, Cache::new(10));
        assert_eq!(coordinator.like_info(&ActivityId::from("a")), ActivityLikeInfo::default());
        assert!(coordinator.view().is_none());
    }

    #[tokio::test]
    async fn failed_write_restores_snapshot() {
        let mut store = MockLikeStore::new();
        store
            .expect_fetch_like_rows()
            .times(1)
            .returning(|_| Ok(rows(3, false)));
        store
            .expect_insert_like()
            .times(1)
            .returning(|_, _| Err(StoreError::Transport("timeout".to_string())));

        let coordinator = coordinator(store, Cache::new(10));
        let before = coordinator.load().await.unwrap();
        let a = ActivityId::from("a");
        assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(3, false));

        let err = coordinator.toggle(&a, false).await.unwrap_err();
        assert_eq!(err.activity_id, a);
        assert!(err.source.is_transient());
        assert_eq!(coordinator.view(), Some(before));
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[tokio::test]
    async fn committed_write_reconciles() {
        let mut store = MockLikeStore::new();
        let mut fetches = 0;
        store.expect_fetch_like_rows().times(2).returning(move |_| {
            fetches += 1;
            Ok(rows(3, fetches > 1))
        });
        store.expect_insert_like().times(1).returning(|_, _| Ok(()));

        let coordinator = coordinator(store, Cache::new(10));
        coordinator.load().await.unwrap();

        let a = ActivityId::from("a");
        let outcome = coordinator.toggle(&a, false).await.unwrap();
        assert!(outcome.is_liked);
        assert!(outcome.reconciled);
        assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(4, true));
    }

    #[tokio::test]
    async fn failed_reconciliation_keeps_optimistic_view() {
        let mut store = MockLikeStore::new();
        let mut fetches = 0;
        store.expect_fetch_like_rows().times(2).returning(move |_| {
            fetches += 1;
            if fetches == 1 {
                Ok(rows(1, true))
            } else {
                Err(StoreError::Transport("offline".to_string()))
            }
        });
        store.expect_delete_like().times(1).returning(|_, _| Ok(()));

        let coordinator = coordinator(store, Cache::new(10));
        coordinator.load().await.unwrap();

        let a = ActivityId::from("a");
        let outcome = coordinator.toggle(&a, true).await.unwrap();
        assert!(!outcome.is_liked);
        assert!(!outcome.reconciled);
        assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, false));
    }

    #[tokio::test]
    async fn reconciliation_can_be_disabled() {
        let mut store = MockLikeStore::new();
        store
            .expect_fetch_like_rows()
            .times(1)
            .returning(|_| Ok(rows(2, false)));
        store.expect_insert_like().times(1).returning(|_, _| Ok(()));

        let config = SocialConfig::new().with_reconcile_after_commit(false);
        let coordinator = LikeCoordinator::from_config(
            Arc::new(store),
            &config,
            [ActivityId::from("a")],
            UserId::from("me"),
        );
        coordinator.load().await.unwrap();

        let a = ActivityId::from("a");
        let outcome = coordinator.toggle(&a, false).await.unwrap();
        assert!(!outcome.reconciled);
        assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(3, true));
    }

    #[tokio::test]
    async fn toggle_without_view_leaves_cache_empty_on_failure() {
        let mut store = MockLikeStore::new();
        store
            .expect_insert_like()
            .returning(|_, _| Err(StoreError::Rejected("nope".to_string())));

        let coordinator = coordinator(store, Cache::new(10));
        assert!(coordinator.toggle(&ActivityId::from("a"), false).await.is_err());
        assert!(coordinator.view().is_none());
    }

    #[tokio::test]
    async fn retarget_drops_old_view() {
        let mut store = MockLikeStore::new();
        store.expect_fetch_like_rows().returning(|_| Ok(Vec::new()));

        let cache = Cache::new(10);
        let mut coordinator = coordinator(store, cache.clone());
        coordinator.load().await.unwrap();
        let old_key = BatchKey::new([ActivityId::from("a"), ActivityId::from("b")]);
        assert!(cache.get(&old_key).is_some());

        coordinator.retarget([ActivityId::from("c")]);
        assert!(cache.get(&old_key).is_none());
        assert!(coordinator.view().is_none());
        assert_eq!(coordinator.activity_ids(), &[ActivityId::from("c")]);
    }

    #[tokio::test]
    async fn drop_invalidates_view() {
        let mut store = MockLikeStore::new();
        store.expect_fetch_like_rows().returning(|_| Ok(Vec::new()));

        let cache = Cache::new(10);
        let coordinator = coordinator(store, cache.clone());
        coordinator.load().await.unwrap();
        drop(coordinator);

        let key = BatchKey::new([ActivityId::from("a"), ActivityId::from("b")]);
        assert!(cache.get(&key).is_none());
    }
}
