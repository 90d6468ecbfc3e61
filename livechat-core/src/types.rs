//! Core types: the normalized comment and the collaborator traits the relay workflow calls.

use async_trait::async_trait;
use prompt::ChatMessage;
use serde::{Deserialize, Serialize};

/// A live chat comment after normalization. Identity key: `comment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub user_name: String,
    pub user_icon_url: String,
    pub user_comment: String,
    pub comment_id: String,
    pub created_at: String,
}

impl Comment {
    /// True when the comment carries text worth relaying: non-empty and not a `#` tag line.
    pub fn is_relayable(&self) -> bool {
        !self.user_comment.is_empty() && !self.user_comment.starts_with('#')
    }
}

/// Read access to the chat history used as context for every AI call.
#[async_trait]
pub trait ChatLogSource: Send + Sync {
    /// Text turns of the conversation so far, oldest first.
    async fn messages(&self) -> crate::error::Result<Vec<ChatMessage>>;
}

/// Runs a prepared message list through the AI response pipeline (speech, chat output).
#[async_trait]
pub trait ResponseDispatcher: Send + Sync {
    async fn dispatch(&self, messages: Vec<ChatMessage>) -> crate::error::Result<()>;
}

/// Receives a viewer comment chosen for relay, as if the viewer had typed it into the chat.
#[async_trait]
pub trait CommentSink: Send + Sync {
    async fn send_chat(&self, text: &str) -> crate::error::Result<()>;
}
