use sip_social::*;
use sip_test_utils::{profile, MemoryLikeStore};
use std::sync::Arc;

type Coordinator = LikeCoordinator<MemoryLikeStore, MokaViewCache<BatchKey, LikesView>>;

fn ids(raw: &[&str]) -> Vec<ActivityId> {
    raw.iter().map(|s| ActivityId::from(*s)).collect()
}

fn setup(store: &Arc<MemoryLikeStore>, activities: &[&str], viewer: &str) -> Coordinator {
    LikeCoordinator::new(
        Arc::clone(store),
        MokaViewCache::new(100),
        ids(activities),
        UserId::from(viewer),
    )
}

#[tokio::test]
async fn test_fetch_likes_counts_and_marks_viewer() {
    let store = MemoryLikeStore::with_likes(&[("a", "userX"), ("a", "userY"), ("b", "userZ")]);

    let view = fetch_likes_for_activities(&store, &ids(&["a", "b", "c"]), &UserId::from("userX"))
        .await
        .unwrap();

    assert_eq!(view.get(&"a".into()), Some(&ActivityLikeInfo::new(2, true)));
    assert_eq!(view.get(&"b".into()), Some(&ActivityLikeInfo::new(1, false)));
    assert_eq!(view.get(&"c".into()), Some(&ActivityLikeInfo::new(0, false)));
}

#[tokio::test]
async fn test_failed_fetch_produces_no_view() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("a", "u1")]));
    let coordinator = setup(&store, &["a"], "me");

    store.fail_next_read(StoreError::Transport("offline".into()));
    assert!(coordinator.load().await.is_err());
    assert!(coordinator.view().is_none());
}

#[tokio::test]
async fn test_rollback_restores_exact_snapshot() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[
        ("a", "u1"),
        ("a", "u2"),
        ("a", "u3"),
        ("b", "u1"),
    ]));
    let coordinator = setup(&store, &["a", "b"], "me");
    let before = coordinator.load().await.unwrap();
    let a = ActivityId::from("a");
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(3, false));

    store.fail_next_write(StoreError::Transport("timeout".into()));
    let err = coordinator.toggle(&a, false).await.unwrap_err();

    assert_eq!(err.activity_id, a);
    assert_eq!(err.source, StoreError::Transport("timeout".into()));
    assert_eq!(coordinator.view(), Some(before));
    assert!(!store.has_like("a", "me"));
}

#[tokio::test]
async fn test_commit_reconciles_with_store() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("a", "u1"), ("a", "u2"), ("a", "u3")]));
    let coordinator = setup(&store, &["a"], "me");
    coordinator.load().await.unwrap();
    let a = ActivityId::from("a");

    let outcome = coordinator.toggle(&a, false).await.unwrap();

    assert!(outcome.is_liked);
    assert!(outcome.reconciled);
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(4, true));
    assert!(store.has_like("a", "me"));
    assert_eq!(store.calls().fetch_like_rows, 2);
}

#[tokio::test]
async fn test_reconciliation_picks_up_concurrent_likes() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("a", "u1")]));
    let coordinator = setup(&store, &["a"], "me");
    coordinator.load().await.unwrap();

    // Another session likes the activity before our write lands
    store.add_like("a", "u2");

    let a = ActivityId::from("a");
    coordinator.toggle(&a, false).await.unwrap();
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(3, true));
}

#[tokio::test]
async fn test_optimistic_update_visible_while_write_in_flight() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("a", "u1"), ("a", "me")]));
    let coordinator = setup(&store, &["a"], "me");
    coordinator.load().await.unwrap();
    let a = ActivityId::from("a");

    store.pause_writes();
    let toggle = coordinator.toggle(&a, true);
    tokio::pin!(toggle);

    assert!(futures::poll!(&mut toggle).is_pending());
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, false));
    assert!(coordinator.has_pending());
    assert_eq!(coordinator.pending_count(), 1);

    store.resume_writes();
    let outcome = toggle.await.unwrap();

    assert!(!outcome.is_liked);
    assert!(!coordinator.has_pending());
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, false));
}

#[tokio::test]
async fn test_dropped_toggle_clears_pending() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[]));
    let coordinator = setup(&store, &["a"], "me");
    coordinator.load().await.unwrap();
    let a = ActivityId::from("a");

    store.pause_writes();
    {
        let toggle = coordinator.toggle(&a, false);
        tokio::pin!(toggle);
        assert!(futures::poll!(&mut toggle).is_pending());
        assert!(coordinator.has_pending());
    }

    assert!(!coordinator.has_pending());
    assert!(!store.has_like("a", "me"));
}

#[tokio::test]
async fn test_toggles_on_different_activities_are_independent() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("b", "me")]));
    let coordinator = setup(&store, &["a", "b"], "me");
    coordinator.load().await.unwrap();
    let (a, b) = (ActivityId::from("a"), ActivityId::from("b"));

    let (first, second) = futures::join!(coordinator.toggle(&a, false), coordinator.toggle(&b, true));
    assert!(first.unwrap().is_liked);
    assert!(!second.unwrap().is_liked);

    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, true));
    assert_eq!(coordinator.like_info(&b), ActivityLikeInfo::new(0, false));
}

#[tokio::test]
async fn test_overlapping_failed_toggles_leave_no_phantom_like() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[]));
    let coordinator = setup(&store, &["a", "b"], "me");
    coordinator.load().await.unwrap();
    let (a, b) = (ActivityId::from("a"), ActivityId::from("b"));

    store.pause_writes();
    let toggle_a = coordinator.toggle(&a, false);
    let toggle_b = coordinator.toggle(&b, false);
    tokio::pin!(toggle_a);
    tokio::pin!(toggle_b);
    assert!(futures::poll!(&mut toggle_a).is_pending());
    assert!(futures::poll!(&mut toggle_b).is_pending());
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, true));
    assert_eq!(coordinator.like_info(&b), ActivityLikeInfo::new(1, true));

    store.fail_next_write(StoreError::Transport("timeout".into()));
    store.fail_next_write(StoreError::Transport("timeout".into()));
    store.resume_writes();

    assert!(toggle_a.await.is_err());
    assert!(toggle_b.await.is_err());

    assert!(!store.has_like("a", "me"));
    assert!(!store.has_like("b", "me"));
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(0, false));
    assert_eq!(coordinator.like_info(&b), ActivityLikeInfo::new(0, false));
    assert!(!coordinator.has_pending());
}

#[tokio::test]
async fn test_failed_toggle_keeps_commit_of_other_activity() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[]));
    let coordinator = setup(&store, &["a", "b"], "me");
    coordinator.load().await.unwrap();
    let (a, b) = (ActivityId::from("a"), ActivityId::from("b"));

    store.pause_writes();
    let toggle_b = coordinator.toggle(&b, false);
    let toggle_a = coordinator.toggle(&a, false);
    tokio::pin!(toggle_b);
    tokio::pin!(toggle_a);
    assert!(futures::poll!(&mut toggle_b).is_pending());
    assert!(futures::poll!(&mut toggle_a).is_pending());

    store.resume_writes();
    assert!(toggle_a.await.unwrap().is_liked);

    // b snapshotted before a committed
    store.fail_next_write(StoreError::Transport("timeout".into()));
    assert!(toggle_b.await.is_err());

    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, true));
    assert_eq!(coordinator.like_info(&b), ActivityLikeInfo::new(0, false));
}

#[tokio::test]
async fn test_lone_failed_toggle_does_not_refetch() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("a", "u1")]));
    let coordinator = setup(&store, &["a", "b"], "me");
    coordinator.load().await.unwrap();

    store.fail_next_write(StoreError::Transport("timeout".into()));
    assert!(coordinator.toggle(&"a".into(), false).await.is_err());
    assert_eq!(store.calls().fetch_like_rows, 1);
}

#[tokio::test]
async fn test_stale_toggle_on_same_pair_is_not_serialized() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[]));
    let coordinator = setup(&store, &["a"], "me");
    coordinator.load().await.unwrap();
    let a = ActivityId::from("a");

    coordinator.toggle(&a, false).await.unwrap();

    // Caller still believes the activity is not liked: the duplicate insert
    // conflicts and the view falls back to its state at call time
    let err = coordinator.toggle(&a, false).await.unwrap_err();
    assert!(err.source.is_conflict());
    assert_eq!(coordinator.like_info(&a), ActivityLikeInfo::new(1, true));
    assert_eq!(store.calls().insert_like, 2);
}

#[tokio::test]
async fn test_liked_by_users_most_recent_first() {
    let store = MemoryLikeStore::with_likes(&[("a", "carol"), ("a", "alice"), ("a", "bob")]);
    store.add_profile(profile("alice"));
    store.add_profile(profile("bob"));
    store.add_profile(profile("carol"));

    let users = fetch_liked_by_users(&store, &"a".into()).await.unwrap();
    let names: Vec<_> = users.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(names, vec!["bob", "alice", "carol"]);
}

#[tokio::test]
async fn test_liked_by_users_without_likes_skips_profiles() {
    let store = MemoryLikeStore::new();

    let users = fetch_liked_by_users(&store, &"a".into()).await.unwrap();
    assert!(users.is_empty());
    assert_eq!(store.calls().fetch_liker_ids, 1);
    assert_eq!(store.calls().fetch_public_profiles, 0);
}

#[tokio::test]
async fn test_retarget_then_load_new_batch() {
    let store = Arc::new(MemoryLikeStore::with_likes(&[("a", "u1"), ("c", "me")]));
    let mut coordinator = setup(&store, &["a"], "me");
    coordinator.load().await.unwrap();

    coordinator.retarget(ids(&["c"]));
    assert_eq!(coordinator.like_info(&"c".into()), ActivityLikeInfo::default());

    coordinator.load().await.unwrap();
    assert_eq!(coordinator.like_info(&"c".into()), ActivityLikeInfo::new(1, true));
    assert_eq!(coordinator.like_info(&"a".into()), ActivityLikeInfo::default());
}
