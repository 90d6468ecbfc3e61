//! # Continuity
//!
//! Decides, once per poll cycle, whether to relay a viewer comment or keep the conversation
//! alive on the streamer's side (continue, introduce a new topic, or go to sleep).
//!
//! - [`state`]: pure transitions over [`ContinuityState`] and the [`NO_COMMENT_SCHEDULE`] table.
//! - [`settings`]: the settings store the state is read from and written back to.
//! - [`advisor`]: message construction and model-backed judgements.
//! - [`relay`]: [`CommentRelay`], the fetch → decide → dispatch workflow.

pub mod advisor;
pub mod relay;
pub mod settings;
pub mod state;

pub use advisor::{ContinuityAdvisor, LlmContinuityAdvisor};
pub use relay::{CommentRelay, CycleOutcome, RelayComponents};
pub use settings::{InMemorySettingsStore, RelaySettings, SettingsStore};
pub use state::{
    no_comment_action, Action, ContinuityState, NoCommentAction, Selection, Transition,
    NO_COMMENT_SCHEDULE,
};
