//! # Log Indexer
//!
//! Main library for the log indexer.
//!
//! This crate provides the entry point, configuration, and dependency wiring
//! for parsing a log file and indexing its records into OpenSearch.

pub mod config;
pub mod logging;

pub use config::{Dependencies, Settings};

use log_indexer_pipeline::{ConsoleReporter, Summary};
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The document store could not be reached at startup.
    #[error("Could not connect to the index store at {url}: {reason}")]
    StoreUnavailable { url: String, reason: String },

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] log_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] log_indexer_repository::SearchError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a store unavailable error.
    pub fn store_unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Connect to the store, then process the configured log source, writing
/// operator reports to standard output.
///
/// Per-line failures are part of the returned [`Summary`]; only startup and
/// source errors are returned as `Err`.
pub async fn run(settings: &Settings) -> Result<Summary, IndexingError> {
    let Dependencies {
        orchestrator,
        source,
    } = Dependencies::new(settings).await?;

    let mut reporter = ConsoleReporter::stdout();
    let summary = orchestrator.run(source, &mut reporter).await?;

    Ok(summary)
}
