//! Error taxonomy surfaced to front ends.
//!
//! Validation and upstream errors are shown to the user and can be retried;
//! persistence problems are logged by the store and only reach this type when
//! the save scheduler itself is gone.

use crate::board::BoardError;
use crate::interchange::InterchangeError;
use crate::render::RenderError;
use crate::source::ImportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TierListError {
    /// Bad user input: profile URL, empty profile, pasted data
    #[error("{0}")]
    Validation(String),

    /// Remote site unreachable or returned something unexpected
    #[error("{0}")]
    Upstream(String),

    #[error("Persistence unavailable: {0}")]
    Persistence(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Interchange(#[from] InterchangeError),
}

impl From<ImportError> for TierListError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::InvalidIdentifier | ImportError::NoFollowsFound => {
                TierListError::Validation(err.to_string())
            }
            ImportError::UpstreamUnavailable(_) => TierListError::Upstream(err.to_string()),
        }
    }
}

impl TierListError {
    /// Whether re-running the same action may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, TierListError::Upstream(_) | TierListError::Render(RenderError::Failed(_)))
    }
}
