//! Continuity state and its transitions. Everything here is pure; the workflow persists the
//! returned state and performs the returned action.

use std::ops::RangeInclusive;

/// Counters and flags that drive the relay decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuityState {
    /// Continuations generated since the last fetch.
    pub continuation_count: u32,
    /// Consecutive cycles without a new comment.
    pub no_comment_count: u32,
    /// Given up prompting; waiting for a fresh comment.
    pub sleep_mode: bool,
    /// AI-driven conversation keeping is enabled.
    pub continuity_mode: bool,
}

/// What to do on a cycle without new comments, keyed by the incremented no-comment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCommentAction {
    Continue,
    NewTopic,
    Sleep,
}

/// Ordered (count range, action) table. Counts outside every range (0, and 7 upward) do nothing.
pub const NO_COMMENT_SCHEDULE: &[(RangeInclusive<u32>, NoCommentAction)] = &[
    (1..=2, NoCommentAction::Continue),
    (3..=3, NoCommentAction::NewTopic),
    (4..=5, NoCommentAction::Continue),
    (6..=6, NoCommentAction::Sleep),
];

/// Looks up `count` in [`NO_COMMENT_SCHEDULE`].
pub fn no_comment_action(count: u32) -> Option<NoCommentAction> {
    NO_COMMENT_SCHEDULE
        .iter()
        .find(|(range, _)| range.contains(&count))
        .map(|(_, action)| *action)
}

/// How the comment to relay is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Ask the advisor for the comment that best fits the chat log.
    Best,
    /// Uniformly at random.
    Random,
}

/// Side effect chosen for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Generate and dispatch a continuation of the current conversation.
    Continue,
    /// Generate a topic and dispatch its introduction.
    NewTopic,
    /// Dispatch a going-to-sleep message.
    Sleep,
    /// Relay one of the fetched comments through the send callback.
    Relay(Selection),
    Idle,
}

impl From<NoCommentAction> for Action {
    fn from(action: NoCommentAction) -> Self {
        match action {
            NoCommentAction::Continue => Action::Continue,
            NoCommentAction::NewTopic => Action::NewTopic,
            NoCommentAction::Sleep => Action::Sleep,
        }
    }
}

/// New state to persist plus the action to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: ContinuityState,
    pub action: Action,
}

impl ContinuityState {
    /// Awake, no continuation since the last fetch, and continuity mode on.
    pub fn should_check_continuation(&self) -> bool {
        !self.sleep_mode && self.continuation_count < 1 && self.continuity_mode
    }

    /// Result of the continuation check. `None` when no continuation is needed; the cycle then
    /// proceeds with [`before_fetch`](Self::before_fetch).
    pub fn after_continuation_check(&self, needed: bool) -> Option<Transition> {
        if !needed {
            return None;
        }
        let mut state = *self;
        state.continuation_count = state.continuation_count.saturating_add(1);
        if state.no_comment_count < 1 {
            state.no_comment_count = 1;
        }
        Some(Transition {
            state,
            action: Action::Continue,
        })
    }

    /// State persisted right before comments are fetched.
    pub fn before_fetch(&self) -> ContinuityState {
        ContinuityState {
            continuation_count: 0,
            ..*self
        }
    }

    /// Transition after a fetch that returned `fetched` new comments.
    pub fn after_fetch(&self, fetched: usize) -> Transition {
        let mut state = *self;
        if fetched > 0 {
            state.no_comment_count = 0;
            state.sleep_mode = false;
            let selection = if state.continuity_mode {
                Selection::Best
            } else {
                Selection::Random
            };
            return Transition {
                state,
                action: Action::Relay(selection),
            };
        }

        state.no_comment_count = state.no_comment_count.saturating_add(1);
        let action = if state.continuity_mode {
            no_comment_action(state.no_comment_count).map_or(Action::Idle, Action::from)
        } else {
            Action::Idle
        };
        if action == Action::Sleep {
            state.sleep_mode = true;
        }
        Transition { state, action }
    }
}
