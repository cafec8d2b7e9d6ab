//! Loader module for the log indexer pipeline.
//!
//! Loads parsed records into the document store.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use log_indexer_repository::{DocumentIndexClient, SearchError};
use log_indexer_shared::ParsedRecord;

/// Configuration for the index loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum number of retry attempts for failed indexing operations.
    /// Zero sends each record exactly once.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
        }
    }
}

/// Loader that indexes records into a single named index.
///
/// The loader is responsible for:
/// - Sending one index request per record
/// - Optionally retrying transient failures with exponential backoff
pub struct IndexLoader {
    client: Arc<dyn DocumentIndexClient>,
    index: String,
    config: LoaderConfig,
}

impl IndexLoader {
    /// Create a new loader for the given client and index.
    pub fn new(client: Arc<dyn DocumentIndexClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(
        client: Arc<dyn DocumentIndexClient>,
        index: impl Into<String>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            client,
            index: index.into(),
            config,
        }
    }

    /// Name of the target index.
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Index one record and return the identifier assigned by the store.
    #[instrument(skip(self, record), fields(index = %self.index))]
    pub async fn load(&self, record: &ParsedRecord) -> Result<String, SearchError> {
        let mut delay_ms = self.config.initial_retry_delay_ms;
        let mut attempt = 0;

        loop {
            match self.client.index_document(&self.index, record).await {
                Ok(id) => {
                    if attempt > 0 {
                        info!(attempt = attempt, id = %id, "Document index succeeded after retry");
                    }
                    return Ok(id);
                }
                Err(e) => {
                    if attempt >= self.config.max_retries || !Self::is_retryable_error(&e) {
                        if attempt > 0 {
                            debug!(attempt = attempt, error = %e, "Giving up on document");
                        }
                        return Err(e);
                    }

                    attempt += 1;
                    warn!(
                        attempt = attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Document index failed, retrying"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

                    delay_ms = self.next_delay_ms(delay_ms);
                }
            }
        }
    }

    /// Ensure the target index exists.
    pub async fn ensure_index(&self) -> Result<(), PipelineError> {
        self.client.ensure_index_exists(&self.index).await?;
        Ok(())
    }

    /// Backoff delay following `delay_ms`: doubled, capped at the configured maximum.
    fn next_delay_ms(&self, delay_ms: u64) -> u64 {
        std::cmp::min(delay_ms.saturating_mul(2), self.config.max_retry_delay_ms)
    }

    /// Determine if an error is retryable (transient failures).
    fn is_retryable_error(error: &SearchError) -> bool {
        match error {
            SearchError::ConnectionError(_) => true,
            // Rejections are retryable only when the store is shedding load
            SearchError::IndexError(msg) => {
                let msg_lower = msg.to_lowercase();
                msg_lower.contains("rate limit")
                    || msg_lower.contains("timeout")
                    || msg_lower.contains("429")
                    || msg_lower.contains("503")
            }
            SearchError::IndexCreationError(_)
            | SearchError::ParseError(_)
            | SearchError::SerializationError(_) => false,
        }
    }
}
