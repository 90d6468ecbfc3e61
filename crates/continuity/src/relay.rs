//! The per-cycle workflow: read settings, maybe continue, fetch, decide, persist, dispatch.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use comment_feed::CommentSource;
use livechat_core::{ChatLogSource, Comment, CommentSink, ResponseDispatcher};
use prompt::ChatMessage;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, instrument};

use crate::advisor::ContinuityAdvisor;
use crate::settings::SettingsStore;
use crate::state::{Action, ContinuityState, Selection};

/// What a cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No live id configured; nothing fetched, nothing changed.
    Skipped,
    /// A continuation message was dispatched.
    Continued,
    /// A viewer comment was sent through the send callback.
    RelayedComment { comment_id: String, text: String },
    /// A new topic was introduced.
    IntroducedTopic { topic: String },
    /// The sleep message was dispatched and sleep mode turned on.
    Slept,
    /// Nothing dispatched this cycle.
    Idle { no_comment_count: u32 },
    /// The cycle failed; the error was logged and swallowed.
    Failed { error: String },
}

impl CycleOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CycleOutcome::Failed { .. })
    }
}

/// Collaborators of [`CommentRelay`].
#[derive(Clone)]
pub struct RelayComponents {
    pub source: Arc<dyn CommentSource>,
    pub settings: Arc<dyn SettingsStore>,
    pub chat_log: Arc<dyn ChatLogSource>,
    pub advisor: Arc<dyn ContinuityAdvisor>,
    pub dispatcher: Arc<dyn ResponseDispatcher>,
    pub sink: Arc<dyn CommentSink>,
}

/// Runs one relay cycle per call. Callers serialize calls; the relay does no locking of its own
/// beyond what its collaborators do.
#[derive(Clone)]
pub struct CommentRelay {
    components: RelayComponents,
}

impl CommentRelay {
    pub fn new(components: RelayComponents) -> Self {
        Self { components }
    }

    /// One cycle with every error caught, logged and reported as [`CycleOutcome::Failed`].
    pub async fn tick(&self) -> CycleOutcome {
        match self.run_cycle().await {
            Ok(outcome) => {
                debug!(outcome = ?outcome, "relay cycle finished");
                outcome
            }
            Err(e) => {
                let error = format!("{e:#}");
                error!(error = %error, "relay cycle failed");
                CycleOutcome::Failed { error }
            }
        }
    }

    /// One cycle, errors propagated.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let c = &self.components;
        let settings = c.settings.snapshot().await.context("read relay settings")?;
        if settings.live_id.trim().is_empty() {
            debug!("no live id configured, skipping cycle");
            return Ok(CycleOutcome::Skipped);
        }

        let chat_log = c.chat_log.messages().await.context("read chat log")?;
        let system_prompt = settings.system_prompt.as_deref();
        let state = settings.continuity;

        if state.should_check_continuation() {
            let needed = c
                .advisor
                .needs_continuation(&chat_log)
                .await
                .context("continuation check")?;
            if let Some(transition) = state.after_continuation_check(needed) {
                let messages = c.advisor.continuation_messages(system_prompt, &chat_log);
                self.save(transition.state).await?;
                self.dispatch(messages).await?;
                info!(
                    continuation_count = transition.state.continuation_count,
                    "conversation continued without fetching"
                );
                return Ok(CycleOutcome::Continued);
            }
        }

        let state = state.before_fetch();
        self.save(state).await?;

        let comments = c
            .source
            .fetch_new_comments(&settings.live_id, &settings.next_page_token)
            .await
            .context("fetch live comments")?;

        let transition = state.after_fetch(comments.len());
        let next = transition.state;
        match transition.action {
            Action::Relay(selection) => {
                self.save(next).await?;
                let chosen = self.select(selection, &chat_log, &comments).await?;
                info!(
                    comment_id = %chosen.comment_id,
                    user_name = %chosen.user_name,
                    selection = ?selection,
                    candidates = comments.len(),
                    "relaying comment"
                );
                c.sink
                    .send_chat(&chosen.user_comment)
                    .await
                    .context("send comment to chat")?;
                Ok(CycleOutcome::RelayedComment {
                    comment_id: chosen.comment_id.clone(),
                    text: chosen.user_comment.clone(),
                })
            }
            Action::Continue => {
                let messages = c.advisor.continuation_messages(system_prompt, &chat_log);
                self.save(next).await?;
                self.dispatch(messages).await?;
                info!(no_comment_count = next.no_comment_count, "no comments, continuing");
                Ok(CycleOutcome::Continued)
            }
            Action::NewTopic => {
                let topic = c
                    .advisor
                    .another_topic(&chat_log)
                    .await
                    .context("generate new topic")?;
                info!(topic = %topic, "no comments, introducing a new topic");
                let messages = c
                    .advisor
                    .new_topic_messages(system_prompt, &chat_log, &topic);
                self.save(next).await?;
                self.dispatch(messages).await?;
                Ok(CycleOutcome::IntroducedTopic { topic })
            }
            Action::Sleep => {
                let messages = c.advisor.sleep_messages(system_prompt, &chat_log);
                self.save(next).await?;
                self.dispatch(messages).await?;
                info!(no_comment_count = next.no_comment_count, "no comments, going to sleep");
                Ok(CycleOutcome::Slept)
            }
            Action::Idle => {
                self.save(next).await?;
                debug!(no_comment_count = next.no_comment_count, "no comments");
                Ok(CycleOutcome::Idle {
                    no_comment_count: next.no_comment_count,
                })
            }
        }
    }

    async fn select<'a>(
        &self,
        selection: Selection,
        chat_log: &[ChatMessage],
        comments: &'a [Comment],
    ) -> Result<&'a Comment> {
        match selection {
            Selection::Random => pick_random(comments),
            Selection::Best => {
                let index = self
                    .components
                    .advisor
                    .best_comment(chat_log, comments)
                    .await
                    .context("select best comment")?;
                comments
                    .get(index)
                    .ok_or_else(|| anyhow!("best comment index {index} out of range"))
            }
        }
    }

    async fn save(&self, state: ContinuityState) -> Result<()> {
        self.components
            .settings
            .save_continuity(state)
            .await
            .context("persist continuity state")
    }

    async fn dispatch(&self, messages: Vec<ChatMessage>) -> Result<()> {
        self.components
            .dispatcher
            .dispatch(messages)
            .await
            .context("dispatch AI response")
    }
}

/// Uniform pick over `comments`.
pub fn pick_random(comments: &[Comment]) -> Result<&Comment> {
    comments
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| anyhow!("no comment to pick from"))
}
