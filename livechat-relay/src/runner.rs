//! Poll loop, proxy server, and the entry points the CLI subcommands map to.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use continuity::CommentRelay;
use llm_client::{EnvLlmConfig, LlmClient, OpenAILlmClient};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

use crate::components::build_relay;
use crate::config::RelayConfig;
use crate::proxy::{self, ProxyState};

/// Consecutive failed cycles after which every further failure is logged at warn.
pub const FAILURE_WARN_THRESHOLD: u32 = 3;

/// Tracks consecutive failed cycles.
#[derive(Debug, Default)]
pub struct FailureCounter {
    consecutive: u32,
}

impl FailureCounter {
    /// Records one cycle result; returns the current streak of failures.
    pub fn record(&mut self, failed: bool) -> u32 {
        if failed {
            self.consecutive = self.consecutive.saturating_add(1);
        } else {
            self.consecutive = 0;
        }
        self.consecutive
    }

    pub fn should_warn(&self) -> bool {
        self.consecutive >= FAILURE_WARN_THRESHOLD
    }
}

/// Calls `relay.tick()` every `interval` until `shutdown` resolves. One cycle at a time.
pub async fn poll_until<F>(relay: &CommentRelay, interval: Duration, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures = FailureCounter::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Poll loop shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                let outcome = relay.tick().await;
                let streak = failures.record(outcome.is_failure());
                if failures.should_warn() {
                    warn!(consecutive_failures = streak, "Relay cycles keep failing");
                }
            }
        }
    }
}

fn build_llm() -> Result<Arc<dyn LlmClient>> {
    let llm_config = EnvLlmConfig::from_env().context("LLM configuration")?;
    let client = OpenAILlmClient::from_config(&llm_config);
    info!(model = %client.model(), "LLM client ready");
    Ok(Arc::new(client))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Runs the poll loop until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_poller(config: RelayConfig) -> Result<()> {
    let handles = build_relay(&config, build_llm()?)?;
    info!(
        live_id = %config.live_id,
        interval_secs = config.poll_interval_secs,
        "Starting comment poll loop"
    );
    poll_until(
        &handles.relay,
        Duration::from_secs(config.poll_interval_secs),
        shutdown_signal(),
    )
    .await
}

/// Serves the comment proxy endpoint until Ctrl-C.
#[instrument(skip(config))]
pub async fn serve_proxy(config: RelayConfig) -> Result<()> {
    if config.custom_endpoint.is_none() {
        warn!("CUSTOM_ENDPOINT is not set; proxy requests will fail with 500");
    }
    let app = proxy::router(ProxyState::new(config.custom_endpoint.clone()));
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, path = proxy::LIVE_COMMENTS_PATH, "Comment proxy listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Proxy server failed")
}

/// Serves the proxy and runs the poll loop together; returns when either stops.
pub async fn run_all(config: RelayConfig) -> Result<()> {
    let poller = run_poller(config.clone());
    let server = serve_proxy(config);
    tokio::select! {
        res = poller => res,
        res = server => res,
    }
}

/// Validates config, initializes logging, then runs.
pub async fn start<F, Fut>(config: RelayConfig, entry: F) -> Result<()>
where
    F: FnOnce(RelayConfig) -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    config.validate()?;
    livechat_core::init_tracing(&config.log_file)?;
    entry(config).await
}
