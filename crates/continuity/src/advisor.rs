//! Message construction and model-backed judgements used to keep the conversation going.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use livechat_core::Comment;
use llm_client::LlmClient;
use prompt::ChatMessage;
use tracing::{debug, instrument, warn};

/// Judgements and message builders the relay calls during a cycle.
///
/// The builders have defaults from the [`prompt`] crate; implementors usually provide only the
/// three model-backed methods.
#[async_trait]
pub trait ContinuityAdvisor: Send + Sync {
    /// Whether the streamer should keep talking without waiting for a comment.
    async fn needs_continuation(&self, chat_log: &[ChatMessage]) -> Result<bool>;

    /// A fresh topic to introduce when the chat has gone quiet.
    async fn another_topic(&self, chat_log: &[ChatMessage]) -> Result<String>;

    /// Index into `candidates` of the comment to relay. `candidates` is never empty.
    async fn best_comment(&self, chat_log: &[ChatMessage], candidates: &[Comment])
        -> Result<usize>;

    fn continuation_messages(
        &self,
        system_prompt: Option<&str>,
        chat_log: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        prompt::continuation_messages(system_prompt, chat_log)
    }

    fn new_topic_messages(
        &self,
        system_prompt: Option<&str>,
        chat_log: &[ChatMessage],
        topic: &str,
    ) -> Vec<ChatMessage> {
        prompt::new_topic_messages(system_prompt, chat_log, topic)
    }

    fn sleep_messages(
        &self,
        system_prompt: Option<&str>,
        chat_log: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        prompt::sleep_messages(system_prompt, chat_log)
    }
}

/// [`ContinuityAdvisor`] that asks an LLM.
#[derive(Clone)]
pub struct LlmContinuityAdvisor {
    client: Arc<dyn LlmClient>,
}

impl LlmContinuityAdvisor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContinuityAdvisor for LlmContinuityAdvisor {
    #[instrument(skip_all)]
    async fn needs_continuation(&self, chat_log: &[ChatMessage]) -> Result<bool> {
        if chat_log.is_empty() {
            return Ok(false);
        }
        let answer = self
            .client
            .complete(prompt::continuation_check_messages(chat_log))
            .await?;
        let needed = prompt::parse_yes_no(&answer);
        debug!(answer = %answer.trim(), needed, "continuation check answered");
        Ok(needed)
    }

    #[instrument(skip_all)]
    async fn another_topic(&self, chat_log: &[ChatMessage]) -> Result<String> {
        let answer = self
            .client
            .complete(prompt::another_topic_messages(chat_log))
            .await?;
        let topic = answer
            .lines()
            .map(|line| line.trim().trim_matches(|c: char| c == '"' || c == '\''))
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();
        if topic.is_empty() {
            anyhow::bail!("model returned an empty topic");
        }
        Ok(topic)
    }

    #[instrument(skip_all, fields(candidates = candidates.len()))]
    async fn best_comment(
        &self,
        chat_log: &[ChatMessage],
        candidates: &[Comment],
    ) -> Result<usize> {
        if candidates.len() <= 1 {
            return Ok(0);
        }
        let texts = candidates.iter().map(|c| c.user_comment.as_str());
        let answer = self
            .client
            .complete(prompt::best_comment_messages(chat_log, texts))
            .await?;
        match prompt::parse_choice_index(&answer, candidates.len()) {
            Some(index) => Ok(index),
            None => {
                warn!(answer = %answer.trim(), "unusable best-comment answer, taking the first");
                Ok(0)
            }
        }
    }
}
