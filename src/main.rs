//! Main entry point for the giphy CLI

use anyhow::Context;
use clap::Parser;
use giphy_client::cli::{Cli, CliError};
use giphy_client::GiphyClient;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("giphy_client=info"));

    // stdout carries the JSON results
    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Some(addr) = cli.metrics_addr {
        giphy_client::metrics::init_metrics(addr)
            .await
            .map_err(|e| CliError::Metrics(e.to_string()))?;
    }

    let config = cli.client_config()?;
    let client = GiphyClient::new(config).context("failed to build client")?;
    cli.execute(&client).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
