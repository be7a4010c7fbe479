use anyhow::Result;
use clap::Parser;
use commands::{Command, run};
use realtime_common::observability::init_logging;
use realtime_config::{RealtimeConfig, RealtimeConfigLoader, default_config_path};
use realtime_twitter::RealtimeClient;
use std::path::PathBuf;
mod commands;

/// Query Yahoo! JAPAN realtime search and print the results as JSON.
#[derive(Debug, Parser)]
#[command(name = "realtime-app", version)]
struct Cli {
    /// Configuration file; defaults to the per-user config when present.
    #[arg(long, env = "REALTIME_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let mut loader = RealtimeConfigLoader::new();
    if let Some(path) = default_config_path() {
        loader = loader.with_optional_file(path);
    }
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let cfg: RealtimeConfig = loader.load()?;

    // 2) Logging goes to the file sink (and stderr if configured); stdout is for JSON.
    let log_path = init_logging(cfg.log.to_log_config("realtime-app"))?;
    tracing::debug!(log = %log_path.display(), base_url = %cfg.client.base_url, "app.start");

    let client = RealtimeClient::from_config(&cfg.client)?;
    run(&client, cli.command).await
}
