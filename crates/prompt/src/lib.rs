//! # Prompt
//!
//! Chat message types and the message builders used to keep a live-stream conversation going.
//!
//! ## Builders
//!
//! - **Continuation check**: asks the model whether the streamer should keep talking on their own.
//! - **Continuation**: system prompt + chat log + an instruction to continue the current thread.
//! - **Another topic / new topic**: asks for a fresh topic, then asks the streamer to introduce it.
//! - **Sleep**: asks the streamer to announce a break until the next comment arrives.
//! - **Best comment**: numbered candidates; the model answers with one number.
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to LLM APIs (OpenAI-compatible chat completions).

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    /// Prefix used when a message is rendered as a transcript line.
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::System => "System",
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// System instruction used when the settings carry no system prompt.
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are a friendly live streamer chatting with your viewers. Keep replies short and spoken.";

/// Section title for the transcript block.
pub const SECTION_TRANSCRIPT: &str = "Conversation so far:";

/// Section title for the candidate comment list.
pub const SECTION_CANDIDATES: &str = "Viewer comments:";

const CONTINUATION_CHECK_INSTRUCTION: &str = "You watch a live stream conversation between a \
streamer (Assistant) and viewers (User). Decide whether the streamer should keep talking on \
their own right now, without waiting for a new viewer comment. Answer with JSON only: \
{\"answer\": \"true\"} or {\"answer\": \"false\"}.";

const CONTINUATION_INSTRUCTION: &str = "No new viewer comment has arrived. Continue the current \
conversation naturally in one or two sentences. Do not repeat what you already said.";

const ANOTHER_TOPIC_INSTRUCTION: &str = "Suggest one new, light topic the streamer could bring up \
next that differs from the conversation so far. Answer with the topic only, in a few words.";

const SLEEP_INSTRUCTION: &str = "No viewer has commented for a while. Tell the viewers, in one \
short sentence, that you will take a little rest until someone comments again.";

const BEST_COMMENT_INSTRUCTION: &str = "Pick the viewer comment the streamer should answer next: \
the one that best fits the conversation so far. Answer with its number only.";

/// Renders messages as `Role: content` lines, one per message.
pub fn format_transcript(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for msg in messages {
        out.push_str(msg.role.label());
        out.push_str(": ");
        out.push_str(msg.content.trim());
        out.push('\n');
    }
    out
}

fn transcript_block(chat_log: &[ChatMessage]) -> String {
    let mut block = String::from(SECTION_TRANSCRIPT);
    block.push('\n');
    if chat_log.is_empty() {
        block.push_str("(nothing yet)\n");
    } else {
        block.push_str(&format_transcript(chat_log));
    }
    block
}

fn system_content(system_prompt: Option<&str>) -> &str {
    system_prompt
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_MESSAGE)
}

/// Streamer persona, then the chat log as-is, then one closing user instruction.
fn persona_messages(
    system_prompt: Option<&str>,
    chat_log: &[ChatMessage],
    instruction: String,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(chat_log.len() + 2);
    messages.push(ChatMessage::system(system_content(system_prompt)));
    messages.extend(
        chat_log
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .cloned(),
    );
    messages.push(ChatMessage::user(instruction));
    messages
}

/// Messages asking whether the streamer should keep talking without a comment.
/// Parse the reply with [`parse_yes_no`].
pub fn continuation_check_messages(chat_log: &[ChatMessage]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(CONTINUATION_CHECK_INSTRUCTION),
        ChatMessage::user(transcript_block(chat_log)),
    ]
}

/// Messages that make the streamer continue the current thread.
pub fn continuation_messages(
    system_prompt: Option<&str>,
    chat_log: &[ChatMessage],
) -> Vec<ChatMessage> {
    persona_messages(system_prompt, chat_log, CONTINUATION_INSTRUCTION.to_string())
}

/// Messages asking for a single new topic. The reply is the topic text.
pub fn another_topic_messages(chat_log: &[ChatMessage]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ANOTHER_TOPIC_INSTRUCTION),
        ChatMessage::user(transcript_block(chat_log)),
    ]
}

/// Messages that make the streamer introduce `topic`.
pub fn new_topic_messages(
    system_prompt: Option<&str>,
    chat_log: &[ChatMessage],
    topic: &str,
) -> Vec<ChatMessage> {
    let instruction = format!(
        "No viewer is commenting right now. Bring up a new topic naturally and talk about it \
         in one or two sentences. Topic: {}",
        topic.trim()
    );
    persona_messages(system_prompt, chat_log, instruction)
}

/// Messages that make the streamer announce a break.
pub fn sleep_messages(system_prompt: Option<&str>, chat_log: &[ChatMessage]) -> Vec<ChatMessage> {
    persona_messages(system_prompt, chat_log, SLEEP_INSTRUCTION.to_string())
}

/// Messages asking the model to choose one of `candidates` (numbered from 1).
/// Parse the reply with [`parse_choice_index`].
pub fn best_comment_messages<I, S>(chat_log: &[ChatMessage], candidates: I) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut block = transcript_block(chat_log);
    block.push('\n');
    block.push_str(SECTION_CANDIDATES);
    block.push('\n');
    for (i, text) in candidates.into_iter().enumerate() {
        block.push_str(&format!("{}. {}\n", i + 1, text.as_ref().trim()));
    }
    vec![
        ChatMessage::system(BEST_COMMENT_INSTRUCTION),
        ChatMessage::user(block),
    ]
}

/// Reads a yes/no answer. Accepts `{"answer": "true"}`, `true`, `yes`; anything else is `false`.
pub fn parse_yes_no(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    let value = match lower.find("\"answer\"") {
        Some(pos) => &lower[pos + "\"answer\"".len()..],
        None => lower.as_str(),
    };
    let value = value
        .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '"')
        .trim_start();
    value.starts_with("true") || value.starts_with("yes")
}

/// Reads the first number in `answer` as a 1-based choice and returns the 0-based index.
/// Returns `None` when there is no number or it is out of `1..=len`.
pub fn parse_choice_index(answer: &str, len: usize) -> Option<usize> {
    let digits: String = answer
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let choice: usize = digits.parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}
