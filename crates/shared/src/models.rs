//! Data models for the tier list.
//!
//! This module defines the serializable state of the application: imported
//! catalog items, tiers, and the snapshot that bundles them for persistence
//! and export. Wire names match the JSON files produced by the web version of
//! the tier list so existing exports can be loaded as-is.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Reserved bucket id of the unranked list
pub const UNRANKED_BUCKET: &str = "unranked";

/// One imported catalog entry (a followed comic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Last read chapter label, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
}

impl Item {
    /// Create an item without status or chapter information
    pub fn new(id: impl Into<String>, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            status: None,
            chapter: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// A ranked tier row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub label: String,
    pub color: String,
    #[serde(rename = "comics", alias = "items", default)]
    pub items: Vec<Item>,
}

impl Tier {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
            items: Vec::new(),
        }
    }
}

/// Container of an item: either the unranked list or one tier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BucketId {
    Unranked,
    Tier(String),
}

impl BucketId {
    pub fn tier(id: impl Into<String>) -> Self {
        BucketId::Tier(id.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            BucketId::Unranked => UNRANKED_BUCKET,
            BucketId::Tier(id) => id,
        }
    }
}

impl std::fmt::Display for BucketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for BucketId {
    fn from(s: &str) -> Self {
        if s == UNRANKED_BUCKET {
            BucketId::Unranked
        } else {
            BucketId::Tier(s.to_string())
        }
    }
}

impl From<String> for BucketId {
    fn from(s: String) -> Self {
        if s == UNRANKED_BUCKET {
            BucketId::Unranked
        } else {
            BucketId::Tier(s)
        }
    }
}

impl From<BucketId> for String {
    fn from(bucket: BucketId) -> Self {
        match bucket {
            BucketId::Unranked => UNRANKED_BUCKET.to_string(),
            BucketId::Tier(id) => id,
        }
    }
}

impl std::str::FromStr for BucketId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Bucket id must not be empty"));
        }
        Ok(BucketId::from(s))
    }
}

/// Complete serializable application state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(rename = "comics", alias = "allItems", default)]
    pub all_items: Vec<Item>,

    #[serde(default = "default_tiers")]
    pub tiers: Vec<Tier>,

    #[serde(rename = "unrankedComics", alias = "unranked", default)]
    pub unranked: Vec<Item>,

    /// ISO-8601 timestamp of the last import, empty when nothing was imported
    #[serde(rename = "lastUpdated", alias = "lastUpdatedTimestamp", default)]
    pub last_updated: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            all_items: Vec::new(),
            tiers: default_tiers(),
            unranked: Vec::new(),
            last_updated: String::new(),
            source_url: None,
        }
    }
}

impl Snapshot {
    /// Number of items placed in a tier
    pub fn ranked_count(&self) -> usize {
        self.tiers.iter().map(|t| t.items.len()).sum()
    }
}

/// The six tiers a fresh board starts with
pub fn default_tiers() -> Vec<Tier> {
    [
        ("s", "S", "#ff7f7f"),
        ("a", "A", "#ffbf7f"),
        ("b", "B", "#ffdf80"),
        ("c", "C", "#ffff7f"),
        ("d", "D", "#bfff7f"),
        ("f", "F", "#7fff7f"),
    ]
    .into_iter()
    .map(|(id, label, color)| Tier::new(id, label, color))
    .collect()
}

/// Current time in the same shape JavaScript's `toISOString` produces
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
