//! Comick response types.
//!
//! The follow list comes from the site's Next.js data route. Only the fields
//! the importer reads are modelled, and every one of them is optional: the
//! site changes shape without notice and a single odd record must not sink
//! the whole import.

use serde::Deserialize;
use serde_json::Value;

/// Body of `/_next/data/{buildId}/user/{id}/list.json`
#[derive(Debug, Clone, Deserialize)]
pub struct NextData {
    #[serde(rename = "pageProps", default)]
    pub page_props: Option<PageProps>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageProps {
    /// Raw follow records, parsed one by one
    #[serde(default)]
    pub follows: Option<Vec<Value>>,
}

impl NextData {
    pub fn into_follows(self) -> Option<Vec<Value>> {
        self.page_props.and_then(|p| p.follows)
    }
}

/// One entry of a user's follow list
#[derive(Debug, Clone, Deserialize)]
pub struct FollowRecord {
    #[serde(default)]
    pub md_comics: Option<ComickComic>,
    #[serde(default)]
    pub md_chapters: Option<ChapterRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComickComic {
    /// Numeric on the site, kept loose
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub md_covers: Vec<Cover>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub b2key: Option<String>,
    #[serde(default)]
    pub w: Option<u32>,
    #[serde(default)]
    pub h: Option<u32>,
}

/// Last chapter the user read
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterRef {
    #[serde(default)]
    pub chap: Option<String>,
}

impl ComickComic {
    /// Id as a string; numbers and strings are both accepted
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Storage key of the first cover, if any
    pub fn cover_key(&self) -> Option<&str> {
        self.md_covers
            .first()
            .and_then(|c| c.b2key.as_deref())
            .filter(|k| !k.is_empty())
    }
}
