//! LLM-backed response pipeline: answers dispatched message lists and relayed viewer comments.

use std::sync::Arc;

use async_trait::async_trait;
use livechat_core::{ChatLogSource, CommentSink, RelayError, ResponseDispatcher, Result};
use llm_client::LlmClient;
use prompt::{ChatMessage, MessageRole, DEFAULT_SYSTEM_MESSAGE};
use tracing::{info, instrument};

use crate::chat_log::InMemoryChatLog;

/// Runs completions and records every exchange in the shared chat log.
pub struct LlmResponder {
    llm: Arc<dyn LlmClient>,
    chat_log: Arc<InMemoryChatLog>,
    system_prompt: Option<String>,
}

impl LlmResponder {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        chat_log: Arc<InMemoryChatLog>,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            llm,
            chat_log,
            system_prompt,
        }
    }

    async fn answer(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let reply = self
            .llm
            .complete(messages)
            .await
            .map_err(|e| RelayError::Dispatch(format!("{e:#}")))?;
        let reply = reply.trim().to_string();
        println!("{reply}");
        self.chat_log.push(ChatMessage::assistant(reply.clone())).await;
        Ok(reply)
    }

    fn system_message(&self) -> ChatMessage {
        let content = self
            .system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_MESSAGE);
        ChatMessage::system(content)
    }
}

#[async_trait]
impl ResponseDispatcher for LlmResponder {
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    async fn dispatch(&self, messages: Vec<ChatMessage>) -> Result<()> {
        let reply = self.answer(messages).await?;
        info!(reply_len = reply.len(), "Dispatched AI response");
        Ok(())
    }
}

#[async_trait]
impl CommentSink for LlmResponder {
    #[instrument(skip(self))]
    async fn send_chat(&self, text: &str) -> Result<()> {
        self.chat_log.push(ChatMessage::user(text)).await;

        let mut messages = vec![self.system_message()];
        messages.extend(
            self.chat_log
                .messages()
                .await?
                .into_iter()
                .filter(|m| m.role != MessageRole::System),
        );

        let reply = self.answer(messages).await?;
        info!(reply_len = reply.len(), "Answered relayed comment");
        Ok(())
    }
}
