//! Error types for the log indexer pipeline.

use log_indexer_repository::SearchError;
use thiserror::Error;

/// Errors that end a pipeline run.
///
/// Per-line problems (unmatched lines, rejected documents) are reported and
/// skipped; they never surface as a `PipelineError`.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The line source could not be opened or read.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Error from the document store.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl PipelineError {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }
}
