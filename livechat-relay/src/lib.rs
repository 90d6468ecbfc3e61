//! # livechat-relay
//!
//! Binary-side wiring for the live chat relay: env config, CLI, the comment proxy endpoint
//! ([`proxy`]), the LLM responder and chat log, and the poll loop ([`runner`]) that drives
//! [`continuity::CommentRelay`].

pub mod chat_log;
pub mod cli;
pub mod components;
pub mod config;
pub mod proxy;
pub mod responder;
pub mod runner;

pub use chat_log::InMemoryChatLog;
pub use cli::{load_config, Cli, Commands};
pub use components::{build_relay, RelayHandles};
pub use config::RelayConfig;
pub use proxy::{ProxyError, ProxyState};
pub use responder::LlmResponder;
pub use runner::{
    poll_until, run_all, run_poller, serve_proxy, start, FailureCounter, FAILURE_WARN_THRESHOLD,
};
