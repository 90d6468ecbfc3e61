//! Relay configuration, loaded from env (optionally `.env`) with CLI overrides.

mod base;

#[cfg(test)]
mod tests;

pub use base::{RelayConfig, DEFAULT_COMMENT_FEED_URL};
