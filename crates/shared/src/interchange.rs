//! JSON export and import of the full snapshot.
//!
//! Export files use the same shape as the persisted state and are named
//! `{prefix}-{YYYY-MM-DD}.json`. Imports are all-or-nothing: the text is parsed
//! and validated as a whole before anything is handed back.

use crate::board::TierBoard;
use crate::models::{Snapshot, Tier};
use crate::render::{BoardRenderer, RenderError};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("Failed to parse tier list data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tier list data is inconsistent: {0}")]
    Invalid(String),
}

/// Pretty-printed JSON of the whole snapshot
pub fn export_to_text(snapshot: &Snapshot) -> Result<String, InterchangeError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parse and validate a snapshot from exported text
pub fn import_from_text(text: &str) -> Result<Snapshot, InterchangeError> {
    let snapshot: Snapshot = serde_json::from_str(text)?;
    let board = TierBoard::from_snapshot(snapshot).map_err(|e| InterchangeError::Invalid(e.to_string()))?;
    Ok(board.snapshot())
}

/// `{prefix}-{YYYY-MM-DD}.{extension}`
pub fn export_file_name(prefix: &str, extension: &str, date: NaiveDate) -> String {
    format!("{}-{}.{}", prefix, date.format("%Y-%m-%d"), extension)
}

/// Write the snapshot as JSON into `dir`, returning the file path
pub fn write_export(dir: impl AsRef<Path>, prefix: &str, snapshot: &Snapshot) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(export_file_name(prefix, "json", Utc::now().date_naive()));
    let text = export_to_text(snapshot).context("Failed to serialize tier list")?;

    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    info!(path = %path.display(), items = snapshot.all_items.len(), "Exported tier list data");
    Ok(path)
}

/// Render the tiers with `renderer` into `dir`, returning the file path
pub fn write_render(
    dir: impl AsRef<Path>,
    prefix: &str,
    renderer: &dyn BoardRenderer,
    tiers: &[Tier],
) -> Result<PathBuf, RenderError> {
    let dir = dir.as_ref();
    let bytes = renderer.render(tiers)?;

    std::fs::create_dir_all(dir).map_err(|e| RenderError::Failed(e.to_string()))?;
    let path = dir.join(export_file_name(prefix, renderer.extension(), Utc::now().date_naive()));
    std::fs::write(&path, bytes).map_err(|e| RenderError::Failed(e.to_string()))?;

    info!(path = %path.display(), "Rendered tier board");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BucketId, Item};
    use crate::render::TextRenderer;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut board = TierBoard::new();
        board.import_items(vec![
            Item::new("1", "A", "https://img.example/1.jpg").with_status("Ongoing"),
            Item::new("2", "B", "https://img.example/2.jpg"),
        ]);
        board.relocate("1", &BucketId::tier("s")).unwrap();
        board.set_source_url(Some("https://comick.io/user/abc/list".into()));
        board.touch();
        board.snapshot()
    }

    #[test]
    fn test_export_import_round_trip() -> Result<(), InterchangeError> {
        let snapshot = sample_snapshot();
        let text = export_to_text(&snapshot)?;
        assert!(text.contains("\n  \"comics\""));

        let restored = import_from_text(&text)?;
        assert_eq!(restored, snapshot);
        Ok(())
    }

    #[test]
    fn test_import_invalid_json() {
        let err = import_from_text("definitely not json").unwrap_err();
        assert!(matches!(err, InterchangeError::Parse(_)));
    }

    #[test]
    fn test_import_inconsistent_data() {
        let mut snapshot = sample_snapshot();
        let stray = snapshot.tiers[0].items[0].clone();
        snapshot.unranked.push(stray);
        let text = serde_json::to_string(&snapshot).unwrap();

        let err = import_from_text(&text).unwrap_err();
        assert!(matches!(err, InterchangeError::Invalid(_)));
    }

    #[test]
    fn test_import_browser_export_format() -> Result<(), InterchangeError> {
        let text = r##"{
          "comics": [{"id": "42", "title": "Solo Leveling", "imageUrl": "https://meo.comick.pictures/x.jpg", "status": "Completed"}],
          "tiers": [{"id": "s", "label": "S", "color": "#ff7f7f", "comics": [{"id": "42", "title": "Solo Leveling", "imageUrl": "https://meo.comick.pictures/x.jpg", "status": "Completed"}]}],
          "unrankedComics": [],
          "lastUpdated": "2024-05-01T10:00:00.000Z",
          "sourceUrl": ""
        }"##;

        let snapshot = import_from_text(text)?;
        assert_eq!(snapshot.tiers.len(), 1);
        assert_eq!(snapshot.ranked_count(), 1);
        assert_eq!(snapshot.source_url.as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_file_name("comick-tierlist", "json", date),
            "comick-tierlist-2024-03-07.json"
        );
    }

    #[test]
    fn test_write_export_and_render() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let snapshot = sample_snapshot();

        let path = write_export(temp_dir.path(), "comick-tierlist", &snapshot)?;
        assert!(path.exists());
        assert_eq!(import_from_text(&std::fs::read_to_string(&path)?)?, snapshot);

        let rendered = write_render(temp_dir.path(), "comick-tierlist", &TextRenderer::default(), &snapshot.tiers)?;
        assert_eq!(rendered.extension().and_then(|e| e.to_str()), Some("txt"));
        let text = std::fs::read_to_string(rendered)?;
        assert!(text.contains("A"));
        assert!(!text.contains("| B"));
        Ok(())
    }
}
