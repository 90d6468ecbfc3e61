//! Config tests.

use crate::config::base::parse_bool_env;
use crate::config::{RelayConfig, DEFAULT_COMMENT_FEED_URL};
use serial_test::serial;
use std::env;

const KEYS: &[&str] = &[
    "LIVE_ID",
    "PAGE_TOKEN",
    "COMMENT_FEED_URL",
    "CUSTOM_ENDPOINT",
    "BIND_ADDR",
    "PORT",
    "POLL_INTERVAL_SECS",
    "CONVERSATION_CONTINUITY_MODE",
    "SYSTEM_PROMPT",
    "CHAT_LOG_LIMIT",
    "LOG_FILE",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();

    let config = RelayConfig::load(None).unwrap();

    assert_eq!(config.live_id, "");
    assert_eq!(config.page_token, "");
    assert_eq!(config.comment_feed_url, DEFAULT_COMMENT_FEED_URL);
    assert!(config.custom_endpoint.is_none());
    assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    assert_eq!(config.poll_interval_secs, 10);
    assert!(!config.continuity_mode);
    assert!(config.system_prompt.is_none());
    assert_eq!(config.chat_log_limit, 20);
    assert_eq!(config.log_file, "logs/livechat-relay.log");
    config.validate().unwrap();
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    env::set_var("LIVE_ID", "live-env");
    env::set_var("PAGE_TOKEN", "tok-1");
    env::set_var("COMMENT_FEED_URL", "http://feed.local:6001/");
    env::set_var("CUSTOM_ENDPOINT", "https://upstream.example/comments");
    env::set_var("BIND_ADDR", "127.0.0.1");
    env::set_var("PORT", "8080");
    env::set_var("POLL_INTERVAL_SECS", "0");
    env::set_var("CONVERSATION_CONTINUITY_MODE", "on");
    env::set_var("SYSTEM_PROMPT", "  You are Mika.  ");
    env::set_var("CHAT_LOG_LIMIT", "5");

    let config = RelayConfig::load(None).unwrap();

    assert_eq!(config.live_id, "live-env");
    assert_eq!(config.page_token, "tok-1");
    assert_eq!(config.comment_feed_url, "http://feed.local:6001/");
    assert_eq!(
        config.custom_endpoint.as_deref(),
        Some("https://upstream.example/comments")
    );
    assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    assert_eq!(config.poll_interval_secs, 1);
    assert!(config.continuity_mode);
    assert_eq!(config.system_prompt.as_deref(), Some("You are Mika."));
    assert_eq!(config.chat_log_limit, 5);

    let settings = config.initial_settings();
    assert_eq!(settings.live_id, "live-env");
    assert_eq!(settings.next_page_token, "tok-1");
    assert!(settings.continuity.continuity_mode);
    assert_eq!(settings.continuity.no_comment_count, 0);

    clear_env();
}

#[test]
#[serial]
fn test_cli_live_id_overrides_env() {
    clear_env();
    env::set_var("LIVE_ID", "live-env");
    let config = RelayConfig::load(Some(" live-cli ".to_string())).unwrap();
    assert_eq!(config.live_id, "live-cli");
    clear_env();
}

#[test]
#[serial]
fn test_blank_custom_endpoint_counts_as_unset() {
    clear_env();
    env::set_var("CUSTOM_ENDPOINT", "   ");
    let config = RelayConfig::load(None).unwrap();
    assert!(config.custom_endpoint.is_none());
    clear_env();
}

#[test]
#[serial]
fn test_validate_rejects_bad_urls() {
    clear_env();
    env::set_var("COMMENT_FEED_URL", "not a url");
    let config = RelayConfig::load(None).unwrap();
    assert!(config.validate().is_err());

    clear_env();
    env::set_var("CUSTOM_ENDPOINT", "::nope::");
    let config = RelayConfig::load(None).unwrap();
    assert!(config.validate().is_err());
    clear_env();
}

#[test]
fn test_parse_bool_env() {
    for value in ["1", "true", "YES", "y", " on "] {
        assert!(parse_bool_env(value), "{value}");
    }
    for value in ["0", "false", "off", ""] {
        assert!(!parse_bool_env(value), "{value}");
    }
}
