//! Like operations against the remote store
//!
//! Stateless wrappers over [`LikeStore`]. Store failures are returned as is;
//! there is no local recovery or retry here.

use crate::error::StoreError;
use crate::store::LikeStore;
use crate::types::{ActivityId, LikeState, LikesView, PublicProfile, UserId};
use std::collections::HashMap;
use tracing::debug;

/// Like state of every activity in `activity_ids` as seen by `viewer`.
///
/// Every requested activity is present in the result, at zero when nobody
/// liked it. Either the whole view is returned or an error; never a partial map.
///
/// # Errors
/// Any [`StoreError`] from the row fetch.
pub async fn fetch_likes_for_activities<S>(
    store: &S,
    activity_ids: &[ActivityId],
    viewer: &UserId,
) -> Result<LikesView, StoreError>
where
    S: LikeStore + ?Sized,
{
    let mut view = LikesView::zeroed(activity_ids);
    if activity_ids.is_empty() {
        return Ok(view);
    }

    let rows = store.fetch_like_rows(activity_ids).await?;
    debug!(activities = activity_ids.len(), rows = rows.len(), "fetched like rows");

    for row in &rows {
        view.record(row, viewer);
    }
    Ok(view)
}

/// Flip the like of `user_id` on `activity_id`.
///
/// Deletes the pair when it is currently liked, inserts it otherwise.
///
/// # Errors
/// Any [`StoreError`] from the write, including a conflict on duplicate insert.
pub async fn toggle_like<S>(
    store: &S,
    activity_id: &ActivityId,
    user_id: &UserId,
    is_currently_liked: bool,
) -> Result<LikeState, StoreError>
where
    S: LikeStore + ?Sized,
{
    if is_currently_liked {
        store.delete_like(activity_id, user_id).await?;
        Ok(LikeState { is_liked: false })
    } else {
        store.insert_like(activity_id, user_id).await?;
        Ok(LikeState { is_liked: true })
    }
}

/// Profiles of users who liked `activity_id`, most recent like first.
///
/// Skips the profile lookup entirely when nobody liked the activity. Likers
/// without a public profile are left out.
///
/// # Errors
/// Any [`StoreError`] from either fetch.
pub async fn fetch_liked_by_users<S>(
    store: &S,
    activity_id: &ActivityId,
) -> Result<Vec<PublicProfile>, StoreError>
where
    S: LikeStore + ?Sized,
{
    let liker_ids = store.fetch_liker_ids(activity_id).await?;
    if liker_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut profiles: HashMap<UserId, PublicProfile> = store
        .fetch_public_profiles(&liker_ids)
        .await?
        .into_iter()
        .map(|p| (p.user_id.clone(), p))
        .collect();

    Ok(liker_ids
        .iter()
        .filter_map(|id| profiles.remove(id))
        .collect())
}
