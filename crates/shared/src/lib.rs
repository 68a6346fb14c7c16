//! Shared library for the comick tier list.
//!
//! This crate holds everything the front ends have in common:
//! - The tier board model and its controller
//! - Snapshot persistence and the debounced save scheduler
//! - Export, import and rendering of tier lists
//! - The item source contract used by the comick importers
//! - Configuration and logging infrastructure

pub mod board;
pub mod config;
pub mod controller;
pub mod db;
pub mod dnd;
pub mod error;
pub mod interchange;
pub mod logging;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use board::{BoardError, Direction, TierBoard, TierUpdate};
pub use config::Config;
pub use controller::{BoardController, BoardEvent, ImportReport};
pub use db::Database;
pub use dnd::{DragSession, DropCommand};
pub use error::TierListError;
pub use logging::LogConfig;
pub use models::*;
pub use render::{BoardRenderer, TextRenderer};
pub use scheduler::{SaveHandle, SaveScheduler};
pub use source::{ImportError, ItemSource};
pub use store::SnapshotStore;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
