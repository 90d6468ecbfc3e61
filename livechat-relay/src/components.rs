//! Component factory: builds the relay and its collaborators from config.

use std::sync::Arc;

use anyhow::{Context, Result};
use comment_feed::CommentFetcher;
use continuity::{CommentRelay, InMemorySettingsStore, LlmContinuityAdvisor, RelayComponents};
use llm_client::LlmClient;
use tracing::{info, instrument};

use crate::chat_log::InMemoryChatLog;
use crate::config::RelayConfig;
use crate::responder::LlmResponder;

/// Everything the poll loop drives, plus handles tests and callers may want to inspect.
pub struct RelayHandles {
    pub relay: CommentRelay,
    pub settings: Arc<InMemorySettingsStore>,
    pub chat_log: Arc<InMemoryChatLog>,
}

#[instrument(skip(config, llm))]
pub fn build_relay(config: &RelayConfig, llm: Arc<dyn LlmClient>) -> Result<RelayHandles> {
    let fetcher = CommentFetcher::new(&config.comment_feed_url)
        .with_context(|| format!("Invalid COMMENT_FEED_URL: {}", config.comment_feed_url))?;
    let settings = Arc::new(InMemorySettingsStore::new(config.initial_settings()));
    let chat_log = Arc::new(InMemoryChatLog::new(config.chat_log_limit));
    let responder = Arc::new(LlmResponder::new(
        llm.clone(),
        chat_log.clone(),
        config.system_prompt.clone(),
    ));

    info!(
        comment_feed_url = %config.comment_feed_url,
        live_id = %config.live_id,
        continuity_mode = config.continuity_mode,
        chat_log_limit = config.chat_log_limit,
        "Relay components built"
    );

    let relay = CommentRelay::new(RelayComponents {
        source: Arc::new(fetcher),
        settings: settings.clone(),
        chat_log: chat_log.clone(),
        advisor: Arc::new(LlmContinuityAdvisor::new(llm)),
        dispatcher: responder.clone(),
        sink: responder,
    });

    Ok(RelayHandles {
        relay,
        settings,
        chat_log,
    })
}
