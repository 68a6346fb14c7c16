//! Comick site client.
//!
//! Reads a user's public follow list the way the site's own pages do.

pub mod client;
pub mod types;

pub use client::ComickClient;
pub use types::*;
