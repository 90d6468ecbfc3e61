//! Bounded in-process chat log: the recent text turns used as AI context.

use std::collections::VecDeque;

use async_trait::async_trait;
use livechat_core::{ChatLogSource, Result};
use prompt::ChatMessage;
use tokio::sync::RwLock;

/// Keeps the most recent `limit` turns, oldest first.
#[derive(Debug)]
pub struct InMemoryChatLog {
    limit: usize,
    turns: RwLock<VecDeque<ChatMessage>>,
}

impl InMemoryChatLog {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            turns: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn push(&self, message: ChatMessage) {
        if self.limit == 0 {
            return;
        }
        let mut turns = self.turns.write().await;
        turns.push_back(message);
        while turns.len() > self.limit {
            turns.pop_front();
        }
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }
}

#[async_trait]
impl ChatLogSource for InMemoryChatLog {
    async fn messages(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.turns.read().await.iter().cloned().collect())
    }
}
