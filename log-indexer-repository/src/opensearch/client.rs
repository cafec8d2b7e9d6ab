//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `DocumentIndexClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    IndexParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::DocumentIndexClient;
use crate::opensearch::index_config::index_settings;
use log_indexer_shared::ParsedRecord;

/// OpenSearch client implementation.
///
/// Talks to a single node over HTTP. The same document APIs are served by
/// Elasticsearch 7.x, so the client works against either store.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// if client.health_check().await? {
///     let id = client.index_document("application_logs", &record).await?;
/// }
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    url: Url,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the specified URL.
    ///
    /// No request is sent here; use `health_check` to verify connectivity.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub async fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url.clone());
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client,
            url: parsed_url,
        })
    }

    /// The URL this client sends requests to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Extract the document identifier from an index response body.
    fn parse_document_id(body: &Value) -> Result<String, SearchError> {
        body.get("_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| SearchError::parse(format!("Index response has no _id: {}", body)))
    }
}

#[async_trait]
impl DocumentIndexClient for OpenSearchClient {
    #[instrument(skip(self, record), fields(level = %record.level()))]
    async fn index_document(
        &self,
        index: &str,
        record: &ParsedRecord,
    ) -> Result<String, SearchError> {
        let body =
            serde_json::to_value(record).map_err(|e| SearchError::serialization(e.to_string()))?;

        let response = self
            .client
            .index(IndexParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let id = Self::parse_document_id(&response_body)?;
        debug!(index = %index, id = %id, "Document indexed");
        Ok(id)
    }

    async fn ensure_index_exists(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(index_settings())
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another writer may have created it between the two requests
            if error_body.contains("resource_already_exists_exception") {
                debug!(index = %index, "Index created concurrently");
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchError::index_creation(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        debug!(status = %status, "Health check response");
        Ok(status.is_success())
    }
}
