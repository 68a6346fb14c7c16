//! Conversion of raw follow records into board items.

use crate::api::types::{ComickComic, FollowRecord};
use serde_json::Value;
use shared::Item;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Image shown for comics without a cover
pub const PLACEHOLDER_COVER: &str = "https://dummyimage.com/160x200/374151/ffffff?text=No+Cover";

/// Publication status label for the site's numeric code
pub fn status_label(code: Option<i64>) -> &'static str {
    match code {
        Some(1) => "Ongoing",
        Some(2) => "Completed",
        Some(3) => "Cancelled",
        Some(4) => "Hiatus",
        _ => "Unknown",
    }
}

/// Cover URL of a comic under `image_base_url`
pub fn cover_url(comic: &ComickComic, image_base_url: &str) -> String {
    match comic.cover_key() {
        Some(key) => format!("{}/{}", image_base_url.trim_end_matches('/'), key),
        None => PLACEHOLDER_COVER.to_string(),
    }
}

/// Parse follow records into items
///
/// Malformed records and records without a title are skipped. Titles are
/// kept as given and deduplicated exactly, keeping the first occurrence, and source order is preserved.
pub fn parse_follows(follows: &[Value], image_base_url: &str) -> Vec<Item> {
    let mut items = Vec::with_capacity(follows.len());
    let mut titles = HashSet::new();

    for (index, raw) in follows.iter().enumerate() {
        let record: FollowRecord = match serde_json::from_value(raw.clone()) {
            Ok(record) => record,
            Err(e) => {
                warn!(index = index, error = %e, "Skipping malformed follow record");
                continue;
            }
        };

        let Some(comic) = record.md_comics else {
            warn!(index = index, "Follow record has no comic data");
            continue;
        };

        let title = match comic.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => {
                warn!(index = index, "Follow record has no title");
                continue;
            }
        };

        if !titles.insert(title.clone()) {
            debug!(title = %title, "Dropping duplicate title");
            continue;
        }

        let id = comic.id_string().unwrap_or_else(|| format!("comic-{}", index));
        let mut item = Item::new(id, title, cover_url(&comic, image_base_url))
            .with_status(status_label(comic.status));
        item.chapter = record.md_chapters.and_then(|c| c.chap);

        items.push(item);
    }

    debug!(records = follows.len(), items = items.len(), "Parsed follow records");
    items
}
