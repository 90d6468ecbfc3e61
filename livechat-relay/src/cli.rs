//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::RelayConfig;

#[derive(Parser)]
#[command(name = "livechat-relay")]
#[command(about = "Live chat comment relay: proxy endpoint and poll loop", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the comment proxy endpoint (forwards to CUSTOM_ENDPOINT).
    Serve,
    /// Poll live comments and relay them (live id can override LIVE_ID).
    Poll {
        #[arg(short, long)]
        live_id: Option<String>,
    },
    /// Serve the proxy and poll on the same runtime.
    Run {
        #[arg(short, long)]
        live_id: Option<String>,
    },
}

/// Load RelayConfig from environment. If `live_id` is provided it overrides LIVE_ID.
pub fn load_config(live_id: Option<String>) -> Result<RelayConfig> {
    RelayConfig::load(live_id)
}
