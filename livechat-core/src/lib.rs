//! # livechat-core
//!
//! Core types and traits for the live chat relay: the normalized [`Comment`], the collaborator
//! traits the relay workflow calls out to ([`ChatLogSource`], [`ResponseDispatcher`],
//! [`CommentSink`]), the error type, and tracing initialization. Transport-agnostic.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{RelayError, Result};
pub use logger::init_tracing;
pub use types::{ChatLogSource, Comment, CommentSink, ResponseDispatcher};
