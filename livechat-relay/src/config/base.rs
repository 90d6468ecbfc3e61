//! Relay config: comment feed, proxy upstream and listen address, poll loop, logging. Loaded from env.

use anyhow::Result;
use continuity::{ContinuityState, RelaySettings};
use std::env;

/// Default fetcher base URL: the proxy endpoint served by this binary.
pub const DEFAULT_COMMENT_FEED_URL: &str = "http://127.0.0.1:3000/api/customhost/live_comments";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// LIVE_ID
    pub live_id: String,
    /// PAGE_TOKEN; initial pagination token passed through to the feed
    pub page_token: String,
    /// COMMENT_FEED_URL; base URL the poller fetches comments from
    pub comment_feed_url: String,
    /// CUSTOM_ENDPOINT; upstream the proxy endpoint forwards to
    pub custom_endpoint: Option<String>,
    /// BIND_ADDR
    pub bind_addr: String,
    /// PORT
    pub port: u16,
    /// POLL_INTERVAL_SECS (min 1)
    pub poll_interval_secs: u64,
    /// CONVERSATION_CONTINUITY_MODE
    pub continuity_mode: bool,
    /// SYSTEM_PROMPT
    pub system_prompt: Option<String>,
    /// CHAT_LOG_LIMIT; chat turns kept as context
    pub chat_log_limit: usize,
    /// LOG_FILE
    pub log_file: String,
}

impl RelayConfig {
    /// Load from environment variables. `live_id` overrides LIVE_ID if provided.
    pub fn load(live_id: Option<String>) -> Result<Self> {
        let live_id = live_id
            .or_else(|| env::var("LIVE_ID").ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let page_token = env::var("PAGE_TOKEN").unwrap_or_default();
        let comment_feed_url = env::var("COMMENT_FEED_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMENT_FEED_URL.to_string());
        let custom_endpoint = non_empty_var("CUSTOM_ENDPOINT");
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10)
            .max(1);
        let continuity_mode = env::var("CONVERSATION_CONTINUITY_MODE")
            .ok()
            .map(|s| parse_bool_env(&s))
            .unwrap_or(false);
        let system_prompt = non_empty_var("SYSTEM_PROMPT");
        let chat_log_limit = env::var("CHAT_LOG_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/livechat-relay.log".to_string());

        Ok(Self {
            live_id,
            page_token,
            comment_feed_url,
            custom_endpoint,
            bind_addr,
            port,
            poll_interval_secs,
            continuity_mode,
            system_prompt,
            chat_log_limit,
            log_file,
        })
    }

    /// Validate config (URLs must parse when set).
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.comment_feed_url).is_err() {
            anyhow::bail!(
                "COMMENT_FEED_URL is not a valid URL: {}",
                self.comment_feed_url
            );
        }
        if let Some(ref endpoint) = self.custom_endpoint {
            if reqwest::Url::parse(endpoint).is_err() {
                anyhow::bail!("CUSTOM_ENDPOINT is set but not a valid URL: {}", endpoint);
            }
        }
        Ok(())
    }

    /// `bind_addr:port` for the proxy listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Settings-store contents at startup.
    pub fn initial_settings(&self) -> RelaySettings {
        RelaySettings {
            live_id: self.live_id.clone(),
            next_page_token: self.page_token.clone(),
            system_prompt: self.system_prompt.clone(),
            continuity: ContinuityState {
                continuity_mode: self.continuity_mode,
                ..Default::default()
            },
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn parse_bool_env(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}
