//! Like toggle state machine
//!
//! ```text
//! Idle -> Pending -> Committed  -> Idle
//!                 \-> RolledBack -> Idle
//! ```
//!
//! One [`ToggleOp`] tracks a single toggle of one (activity, user) pair.
//! Overlapping operations on the same pair are not serialized.

use crate::error::TransitionError;
use crate::types::{ActivityId, ActivityLikeInfo, UserId};
use tracing::debug;

/// Lifecycle state of one toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleState {
    /// No write in flight
    Idle,
    /// Optimistic change applied, write in flight
    Pending,
    /// Write succeeded
    Committed,
    /// Write failed and the snapshot was restored
    RolledBack,
}

impl ToggleState {
    /// Whether the operation has settled
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ToggleState::Committed | ToggleState::RolledBack)
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: ToggleState) -> Vec<ToggleState> {
    use ToggleState::{Committed, Idle, Pending, RolledBack};
    match from {
        Idle => vec![Pending],
        Pending => vec![Committed, RolledBack],
        Committed | RolledBack => vec![Idle],
    }
}

/// Validate a state transition.
///
/// With the `strict-debug` feature an illegal transition panics instead.
///
/// # Errors
/// `TransitionError` if `to` is not reachable from `from`.
pub fn validate_transition(from: ToggleState, to: ToggleState) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal toggle transition attempted: {from:?} -> {to:?}");

        #[cfg(not(feature = "strict-debug"))]
        Err(TransitionError { from, to })
    }
}

/// What a toggle does to the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleDirection {
    /// Insert the pair
    Like,
    /// Delete the pair
    Unlike,
}

impl ToggleDirection {
    /// Direction that flips the current state
    #[inline]
    #[must_use]
    pub fn from_current(is_currently_liked: bool) -> Self {
        if is_currently_liked {
            ToggleDirection::Unlike
        } else {
            ToggleDirection::Like
        }
    }

    /// Whether the pair exists afterwards
    #[inline]
    #[must_use]
    pub fn is_liked_after(self) -> bool {
        matches!(self, ToggleDirection::Like)
    }

    /// Apply the expected effect to a cached entry
    pub fn apply(self, info: &mut ActivityLikeInfo) {
        match self {
            ToggleDirection::Like => {
                info.count = info.count.saturating_add(1);
                info.is_liked_by_me = true;
            }
            ToggleDirection::Unlike => {
                info.count = info.count.saturating_sub(1);
                info.is_liked_by_me = false;
            }
        }
    }
}

/// One toggle of an (activity, user) pair
#[derive(Debug, Clone)]
pub struct ToggleOp {
    activity_id: ActivityId,
    user_id: UserId,
    direction: ToggleDirection,
    state: ToggleState,
}

impl ToggleOp {
    /// Create operation in `Idle`
    #[must_use]
    pub fn new(activity_id: ActivityId, user_id: UserId, is_currently_liked: bool) -> Self {
        Self {
            activity_id,
            user_id,
            direction: ToggleDirection::from_current(is_currently_liked),
            state: ToggleState::Idle,
        }
    }

    /// Move to `to`.
    ///
    /// # Errors
    /// `TransitionError` if the transition is illegal; the state is unchanged.
    pub fn advance(&mut self, to: ToggleState) -> Result<(), TransitionError> {
        validate_transition(self.state, to)?;
        debug!(
            activity_id = %self.activity_id,
            user_id = %self.user_id,
            from = ?self.state,
            to = ?to,
            "toggle transition"
        );
        self.state = to;
        Ok(())
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Direction of the toggle
    #[inline]
    #[must_use]
    pub fn direction(&self) -> ToggleDirection {
        self.direction
    }

    /// Target activity
    #[inline]
    #[must_use]
    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    /// Acting user
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ToggleState; 4] = [
        ToggleState::Idle,
        ToggleState::Pending,
        ToggleState::Committed,
        ToggleState::RolledBack,
    ];

    #[test]
    fn pending_settles_either_way() {
        assert!(validate_transition(ToggleState::Pending, ToggleState::Committed).is_ok());
        assert!(validate_transition(ToggleState::Pending, ToggleState::RolledBack).is_ok());
        assert!(validate_transition(ToggleState::Pending, ToggleState::Idle).is_err());
    }

    #[test]
    fn idle_cannot_skip_pending() {
        assert!(validate_transition(ToggleState::Idle, ToggleState::Committed).is_err());
        assert!(validate_transition(ToggleState::Idle, ToggleState::RolledBack).is_err());
    }

    #[test]
    fn terminal_states_return_to_idle() {
        for state in ALL.into_iter().filter(|s| s.is_terminal()) {
            assert_eq!(allowed_transitions(state), vec![ToggleState::Idle]);
        }
    }

    #[test]
    fn validate_agrees_with_allowed() {
        for from in ALL {
            for to in ALL {
                let allowed = allowed_transitions(from).contains(&to);
                assert_eq!(validate_transition(from, to).is_ok(), allowed);
            }
        }
    }

    #[test]
    fn op_full_cycle() {
        let mut op = ToggleOp::new(ActivityId::from("a"), UserId::from("u"), false);
        assert_eq!(op.direction(), ToggleDirection::Like);

        op.advance(ToggleState::Pending).unwrap();
        op.advance(ToggleState::RolledBack).unwrap();
        op.advance(ToggleState::Idle).unwrap();
        op.advance(ToggleState::Pending).unwrap();

        let err = op.advance(ToggleState::Idle).unwrap_err();
        assert_eq!(err.from, ToggleState::Pending);
        assert_eq!(op.state(), ToggleState::Pending);
    }

    #[test]
    fn direction_applies_expected_effect() {
        let mut info = ActivityLikeInfo::new(3, false);
        ToggleDirection::Like.apply(&mut info);
        assert_eq!(info, ActivityLikeInfo::new(4, true));

        ToggleDirection::Unlike.apply(&mut info);
        assert_eq!(info, ActivityLikeInfo::new(3, false));
    }

    #[test]
    fn unlike_never_underflows() {
        let mut info = ActivityLikeInfo::new(0, true);
        ToggleDirection::Unlike.apply(&mut info);
        assert_eq!(info, ActivityLikeInfo::new(0, false));
    }
}
