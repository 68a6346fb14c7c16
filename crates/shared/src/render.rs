//! Rendering the tier board to a file.
//!
//! Raster rendering lives outside this workspace; anything that can turn the
//! tiers into bytes implements `BoardRenderer`. The unranked list is never
//! part of a render.

use crate::models::Tier;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Nothing to render: every tier is empty")]
    EmptyBoard,

    #[error("Rendering failed: {0}")]
    Failed(String),
}

/// Turns the tier rows into a file payload
pub trait BoardRenderer {
    /// File extension of the rendered output, without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, tiers: &[Tier]) -> Result<Vec<u8>, RenderError>;
}

/// Plain-text board, one row per tier
#[derive(Debug, Clone)]
pub struct TextRenderer {
    /// Maximum characters per title before it is shortened
    pub max_title_chars: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { max_title_chars: 40 }
    }
}

impl TextRenderer {
    fn shorten(&self, title: &str) -> String {
        if title.chars().count() <= self.max_title_chars {
            return title.to_string();
        }
        let mut short: String = title.chars().take(self.max_title_chars.saturating_sub(1)).collect();
        short.push('…');
        short
    }

    /// Render to a string, including empty boards
    pub fn render_text(&self, tiers: &[Tier]) -> String {
        let mut out = String::new();
        for tier in tiers {
            let titles: Vec<String> = tier.items.iter().map(|i| self.shorten(&i.title)).collect();
            let row = format!("{:<5} {} | {}", tier.label, tier.color, titles.join(" | "));
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }
}

impl BoardRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, tiers: &[Tier]) -> Result<Vec<u8>, RenderError> {
        if tiers.iter().all(|t| t.items.is_empty()) {
            return Err(RenderError::EmptyBoard);
        }
        Ok(self.render_text(tiers).into_bytes())
    }
}
