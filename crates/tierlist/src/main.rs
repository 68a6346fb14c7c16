//! Comick tier list CLI application.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use shared::{BoardController, Config, LogConfig, SaveScheduler, SnapshotStore};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_config(&config, "tierlist");
    if args.verbose {
        log_config = log_config.verbose();
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    // Restore the saved board
    let store = SnapshotStore::open(
        config.storage.key.clone(),
        config.database_path(),
        config.cookie_jar_path(),
        config.storage.max_cookie_bytes,
    );
    let mut controller = BoardController::restore(store.load());
    info!(
        items = controller.board().total_count(),
        ranked = controller.board().ranked_count(),
        "Restored tier list"
    );

    let scheduler = SaveScheduler::spawn(store, config.save_delay());
    controller.attach_saver(scheduler.handle());

    let outcome = commands::run(args.command, &mut controller, &config).await;

    // Pending edits are written even when the command failed
    let stats = scheduler.shutdown().await?;
    if stats.dropped > 0 {
        warn!(dropped = stats.dropped, "Some changes could not be saved");
    }

    outcome
}
