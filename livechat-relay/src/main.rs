use anyhow::Result;
use clap::Parser;
use livechat_relay::{load_config, run_all, run_poller, serve_proxy, start, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => start(load_config(None)?, serve_proxy).await,
        Commands::Poll { live_id } => start(load_config(live_id)?, run_poller).await,
        Commands::Run { live_id } => start(load_config(live_id)?, run_all).await,
    }
}
