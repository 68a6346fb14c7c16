//! Contract for fetching a user's follows from an external catalog.
//!
//! The board never scrapes anything itself. A front end extracts the user id
//! from a pasted profile URL and hands it to an `ItemSource`, which returns the
//! items to import or one of the `ImportError` cases.

use crate::models::Item;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PROFILE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)comick\.(?:io|dev)/user/([a-f0-9-]+)").expect("profile URL pattern is valid")
});

static USER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-f0-9-]+$").expect("user id pattern is valid"));

/// Errors returned by an item source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Invalid comick user id. Use a profile URL like https://comick.io/user/<user-id>/list")]
    InvalidIdentifier,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("No comics found. Make sure the user profile exists and has public follows.")]
    NoFollowsFound,
}

/// Source of importable items for a user
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Fetch the deduplicated, ordered follows of `user_id`
    async fn fetch_items(&self, user_id: &str) -> Result<Vec<Item>, ImportError>;
}

/// Extract the user id from a pasted profile URL
pub fn extract_user_id(url: &str) -> Option<String> {
    PROFILE_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `user_id` has the shape of a comick user id (hex digits and hyphens)
pub fn is_valid_user_id(user_id: &str) -> bool {
    USER_ID.is_match(user_id)
}
