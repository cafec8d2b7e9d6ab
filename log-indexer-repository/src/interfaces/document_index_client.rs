//! Document index client trait definition.
//!
//! This module defines the abstract interface for storing parsed log records,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;

use crate::errors::SearchError;
use log_indexer_shared::ParsedRecord;

/// Abstract interface for document store operations.
///
/// The client is created and owned by the caller and passed into the pipeline,
/// so a run never depends on process-wide connection state.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>`. A failure for one document
/// never invalidates the client for the next one.
#[async_trait]
pub trait DocumentIndexClient: Send + Sync {
    /// Index a single record as a new document.
    ///
    /// # Arguments
    ///
    /// * `index` - The name of the target index
    /// * `record` - The parsed record; its three fields become the document body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The identifier the store assigned to the document
    /// * `Err(SearchError)` - If the store is unreachable or rejects the document
    ///
    /// # Example
    ///
    /// ```ignore
    /// let id = client.index_document("application_logs", &record).await?;
    /// println!("Indexed document ID: {}", id);
    /// ```
    async fn index_document(&self, index: &str, record: &ParsedRecord)
        -> Result<String, SearchError>;

    /// Ensure the index exists with mappings for log records.
    ///
    /// If the index already exists it is left untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists or was created successfully
    /// * `Err(SearchError)` - If index creation fails
    async fn ensure_index_exists(&self, index: &str) -> Result<(), SearchError>;

    /// Check if the store is reachable and healthy.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the store answered successfully
    /// * `Ok(false)` - If the store answered with an error status
    /// * `Err(SearchError)` - If the store could not be reached
    async fn health_check(&self) -> Result<bool, SearchError>;
}
