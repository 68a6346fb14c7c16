//! Command handlers.
//!
//! Each handler works on the controller only; persistence happens through the
//! save scheduler attached by `main`.

use anyhow::{Context, Result};
use clap::Subcommand;
use comick_scraper::{ComickClient, ProxyClient};
use shared::interchange::{write_export, write_render};
use shared::source::ItemSource;
use shared::{BoardController, BucketId, Config, Direction, TextRenderer, TierBoard, TierUpdate};
use std::path::PathBuf;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import the follows of a comick profile URL
    Import {
        /// Profile URL, e.g. https://comick.io/user/<user-id>/list
        url: String,
    },

    /// Move an item between buckets (`unranked` or a tier id)
    Move {
        item: String,
        from: BucketId,
        to: BucketId,
    },

    /// Manage tiers
    #[command(subcommand)]
    Tier(TierCommand),

    /// Export the tier list as JSON
    Export {
        /// Output directory, overrides `[export] dir`
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Replace the tier list with a previously exported file
    Load { file: PathBuf },

    /// Render the ranked tiers to a file
    Render {
        /// Output directory, overrides `[export] dir`
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Remove every item and restore the default tiers
    Clear,

    /// Print the current tier list
    Show,
}

#[derive(Subcommand, Debug)]
pub enum TierCommand {
    /// Append a new tier
    Add,
    /// Delete a tier; its items return to unranked
    Remove { id: String },
    /// Change a tier's label or color
    Set {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Move a tier one place up
    Up { id: String },
    /// Move a tier one place down
    Down { id: String },
}

/// Pick the item source: the proxy when configured, the site otherwise
fn item_source(config: &Config) -> Result<Box<dyn ItemSource>> {
    match &config.comick.proxy_url {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Importing through proxy");
            Ok(Box::new(ProxyClient::new(endpoint.clone(), config.request_timeout())?))
        }
        None => Ok(Box::new(ComickClient::from_config(config)?)),
    }
}

pub async fn run(command: Command, controller: &mut BoardController, config: &Config) -> Result<()> {
    match command {
        Command::Import { url } => {
            let source = item_source(config)?;
            let report = controller.import_profile(&url, source.as_ref()).await?;
            if report.nothing_new() {
                println!("All {} comics are already on the board.", report.fetched);
            } else {
                println!("Imported {} of {} comics.", report.added, report.fetched);
            }
        }
        Command::Move { item, from, to } => {
            if controller.move_item(&item, &from, &to)? {
                println!("Moved {} to {}.", item, to);
            }
        }
        Command::Tier(tier) => run_tier(tier, controller)?,
        Command::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir());
            let path = write_export(&dir, &config.export.prefix, &controller.snapshot())?;
            println!("Exported to {}", path.display());
        }
        Command::Load { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            controller.replace_from_text(&text)?;
            println!("Loaded {} comics from {}.", controller.board().total_count(), file.display());
        }
        Command::Render { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir());
            let renderer = TextRenderer::default();
            let path = write_render(&dir, &config.export.prefix, &renderer, controller.board().tiers())?;
            println!("Rendered to {}", path.display());
        }
        Command::Clear => {
            controller.clear_all();
            println!("Cleared the tier list.");
        }
        Command::Show => print!("{}", describe(controller.board())),
    }

    Ok(())
}

fn run_tier(command: TierCommand, controller: &mut BoardController) -> Result<()> {
    match command {
        TierCommand::Add => {
            let id = controller.add_tier();
            println!("Added tier {}.", id);
        }
        TierCommand::Remove { id } => {
            if controller.remove_tier(&id)? {
                println!("Removed tier {}.", id);
            } else {
                println!("The last tier cannot be removed.");
            }
        }
        TierCommand::Set { id, label, color } => {
            controller.update_tier(&id, TierUpdate { label, color })?;
        }
        TierCommand::Up { id } => {
            controller.reorder_tier(&id, Direction::Up)?;
        }
        TierCommand::Down { id } => {
            controller.reorder_tier(&id, Direction::Down)?;
        }
    }
    Ok(())
}

/// Human-readable listing of the board
pub fn describe(board: &TierBoard) -> String {
    let mut out = TextRenderer::default().render_text(board.tiers());

    let unranked: Vec<&str> = board.unranked().iter().map(|i| i.title.as_str()).collect();
    out.push_str(&format!("\nUnranked ({}): {}\n", unranked.len(), unranked.join(" | ")));
    out.push_str(&format!(
        "{} of {} comics ranked\n",
        board.ranked_count(),
        board.total_count()
    ));
    if !board.last_updated().is_empty() {
        out.push_str(&format!("Last updated {}\n", board.last_updated()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Item;
    use tempfile::TempDir;

    fn controller() -> BoardController {
        let mut board = TierBoard::new();
        board.import_items(vec![Item::new("1", "Monster", "x"), Item::new("2", "Pluto", "x")]);
        BoardController::new(board)
    }

    #[tokio::test]
    async fn test_move_and_tier_commands() -> Result<()> {
        let mut controller = controller();
        let config = Config::default();

        run(
            Command::Move {
                item: "1".into(),
                from: BucketId::Unranked,
                to: BucketId::tier("s"),
            },
            &mut controller,
            &config,
        )
        .await?;
        run(
            Command::Tier(TierCommand::Set {
                id: "s".into(),
                label: Some("godly".into()),
                color: None,
            }),
            &mut controller,
            &config,
        )
        .await?;
        run(Command::Tier(TierCommand::Remove { id: "s".into() }), &mut controller, &config).await?;

        let board = controller.board();
        assert!(board.tier("s").is_none());
        assert_eq!(board.unranked().len(), 2);
        assert_eq!(board.unranked()[1].id, "1");
        Ok(())
    }

    #[tokio::test]
    async fn test_export_then_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::default();
        let mut source = controller();
        source.move_item("2", &BucketId::Unranked, &BucketId::tier("a"))?;

        let dir = temp_dir.path().to_path_buf();
        run(Command::Export { dir: Some(dir.clone()) }, &mut source, &config).await?;

        let file = std::fs::read_dir(&dir)?.next().context("no export written")??.path();
        let mut target = BoardController::new(TierBoard::new());
        run(Command::Load { file }, &mut target, &config).await?;

        assert_eq!(target.snapshot(), source.snapshot());
        Ok(())
    }

    #[tokio::test]
    async fn test_render_empty_board_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = BoardController::new(TierBoard::new());
        let result = run(
            Command::Render {
                dir: Some(temp_dir.path().to_path_buf()),
            },
            &mut controller,
            &Config::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_describe() {
        let text = describe(controller().board());
        assert!(text.starts_with("S     #ff7f7f |"));
        assert!(text.contains("Unranked (2): Monster | Pluto"));
        assert!(text.contains("0 of 2 comics ranked"));
    }
}
