//! Test doubles for the relay collaborators.
//!
//! Each double records its calls so tests can assert on what the workflow did without any model
//! or network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use comment_feed::CommentSource;
use continuity::{
    CommentRelay, ContinuityAdvisor, ContinuityState, InMemorySettingsStore, RelayComponents,
    RelaySettings,
};
use livechat_core::{ChatLogSource, Comment, CommentSink, RelayError, ResponseDispatcher};
use prompt::ChatMessage;

pub fn comment(id: &str, text: &str) -> Comment {
    Comment {
        user_name: format!("user-{id}"),
        user_icon_url: String::new(),
        user_comment: text.to_string(),
        comment_id: id.to_string(),
        created_at: "2024-05-01T10:00:00Z".to_string(),
    }
}

/// Returns queued batches in order, then empty batches. `Err` entries become fetch failures.
#[derive(Default)]
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Result<Vec<Comment>, String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, batch: Vec<Comment>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_error(&self, message: &str) {
        self.batches
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentSource for ScriptedSource {
    async fn fetch_new_comments(
        &self,
        live_id: &str,
        page_token: &str,
    ) -> anyhow::Result<Vec<Comment>> {
        self.calls
            .lock()
            .unwrap()
            .push((live_id.to_string(), page_token.to_string()));
        match self.batches.lock().unwrap().pop_front() {
            Some(Ok(batch)) => Ok(batch),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Advisor with fixed answers and call counters.
pub struct ScriptedAdvisor {
    pub continuation_needed: AtomicBool,
    pub best_index: AtomicUsize,
    pub topic: String,
    pub continuation_checks: AtomicUsize,
    pub topic_requests: AtomicUsize,
    pub best_requests: AtomicUsize,
}

impl ScriptedAdvisor {
    pub fn new(continuation_needed: bool) -> Self {
        Self {
            continuation_needed: AtomicBool::new(continuation_needed),
            best_index: AtomicUsize::new(0),
            topic: "summer festivals".to_string(),
            continuation_checks: AtomicUsize::new(0),
            topic_requests: AtomicUsize::new(0),
            best_requests: AtomicUsize::new(0),
        }
    }

    pub fn checks(&self) -> usize {
        self.continuation_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContinuityAdvisor for ScriptedAdvisor {
    async fn needs_continuation(&self, _chat_log: &[ChatMessage]) -> anyhow::Result<bool> {
        self.continuation_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.continuation_needed.load(Ordering::SeqCst))
    }

    async fn another_topic(&self, _chat_log: &[ChatMessage]) -> anyhow::Result<String> {
        self.topic_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.topic.clone())
    }

    async fn best_comment(
        &self,
        _chat_log: &[ChatMessage],
        _candidates: &[Comment],
    ) -> anyhow::Result<usize> {
        self.best_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.best_index.load(Ordering::SeqCst))
    }
}

/// Records every dispatched message list.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub dispatched: Mutex<Vec<Vec<ChatMessage>>>,
    pub fail: AtomicBool,
}

impl RecordingDispatcher {
    pub fn count(&self) -> usize {
        self.dispatched.lock().unwrap().len()
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.dispatched
            .lock()
            .unwrap()
            .last()
            .and_then(|messages| messages.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl ResponseDispatcher for RecordingDispatcher {
    async fn dispatch(&self, messages: Vec<ChatMessage>) -> livechat_core::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RelayError::Dispatch("speech pipeline down".to_string()));
        }
        self.dispatched.lock().unwrap().push(messages);
        Ok(())
    }
}

/// Records every relayed comment text.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentSink for RecordingSink {
    async fn send_chat(&self, text: &str) -> livechat_core::Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct StaticChatLog(pub Vec<ChatMessage>);

#[async_trait]
impl ChatLogSource for StaticChatLog {
    async fn messages(&self) -> livechat_core::Result<Vec<ChatMessage>> {
        Ok(self.0.clone())
    }
}

/// A relay wired to doubles, plus handles to the doubles.
pub struct Harness {
    pub relay: CommentRelay,
    pub source: Arc<ScriptedSource>,
    pub settings: Arc<InMemorySettingsStore>,
    pub advisor: Arc<ScriptedAdvisor>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(continuity_mode: bool, continuation_needed: bool) -> Self {
        let settings = RelaySettings {
            live_id: "live-1".to_string(),
            next_page_token: String::new(),
            system_prompt: Some("You are Mika.".to_string()),
            continuity: ContinuityState {
                continuity_mode,
                ..Default::default()
            },
        };
        Self::with_settings(settings, continuation_needed)
    }

    pub fn with_settings(settings: RelaySettings, continuation_needed: bool) -> Self {
        let source = Arc::new(ScriptedSource::new());
        let settings = Arc::new(InMemorySettingsStore::new(settings));
        let advisor = Arc::new(ScriptedAdvisor::new(continuation_needed));
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let sink = Arc::new(RecordingSink::default());
        let chat_log = Arc::new(StaticChatLog(vec![
            ChatMessage::user("hi Mika"),
            ChatMessage::assistant("Hi! Welcome to the stream."),
        ]));
        let relay = CommentRelay::new(RelayComponents {
            source: source.clone(),
            settings: settings.clone(),
            chat_log,
            advisor: advisor.clone(),
            dispatcher: dispatcher.clone(),
            sink: sink.clone(),
        });
        Self {
            relay,
            source,
            settings,
            advisor,
            dispatcher,
            sink,
        }
    }

    pub async fn state(&self) -> ContinuityState {
        use continuity::SettingsStore;
        self.settings.snapshot().await.unwrap().continuity
    }
}
