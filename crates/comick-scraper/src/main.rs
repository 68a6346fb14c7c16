//! Comick import proxy server.

use anyhow::{Context, Result};
use clap::Parser;
use comick_scraper::{ComickClient, ProxyState};
use shared::{Config, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Address to listen on, overrides `[server] bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_config(&config, "comick-proxy");
    if args.verbose {
        log_config = log_config.verbose();
    }
    shared::logging::init(log_config)?;

    info!("Comick proxy starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    let client = ComickClient::from_config(&config).context("Failed to create comick client")?;
    info!(
        base_url = %config.comick.base_url,
        image_base_url = %config.comick.image_base_url,
        "Using comick site"
    );

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let state = Arc::new(ProxyState::new(Arc::new(client)));

    comick_scraper::serve(state, &bind).await.context("Proxy server failed")?;

    Ok(())
}
