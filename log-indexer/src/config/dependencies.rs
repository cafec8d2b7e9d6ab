//! Dependency initialization and wiring for the log indexer.

use std::sync::Arc;
use tracing::{error, info};

use crate::config::{InputSource, Settings};
use crate::IndexingError;
use log_indexer_pipeline::{
    loader::IndexLoader,
    processor::LineParser,
    source::{BoxedLineSource, LineSource},
    Orchestrator,
};
use log_indexer_repository::{DocumentIndexClient, OpenSearchClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// The opened line source to feed it.
    pub source: BoxedLineSource,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// Connects to the store at `settings.store_url()`, verifies it is
    /// reachable, then opens the log source. Nothing is read from the source
    /// unless the store answered.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError::StoreUnavailable)` - If the store cannot be reached
    /// * `Err(IndexingError)` - If any other initialization step fails
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        let store_url = settings.store_url()?;

        info!(
            store_url = %store_url,
            index = %settings.index,
            "Initializing dependencies"
        );

        // Initialize OpenSearch client
        let search_client = OpenSearchClient::new(store_url.as_str()).await?;

        Self::with_client(settings, Arc::new(search_client)).await
    }

    /// Initialize dependencies around an existing store client.
    pub async fn with_client(
        settings: &Settings,
        client: Arc<dyn DocumentIndexClient>,
    ) -> Result<Self, IndexingError> {
        let store_url = settings.store_url()?;

        // Verify the store is reachable
        match client.health_check().await {
            Ok(true) => info!("Index store connection verified"),
            Ok(false) => {
                error!(store_url = %store_url, "Index store is unhealthy");
                return Err(IndexingError::store_unavailable(
                    store_url.as_str(),
                    "store answered with an error status",
                ));
            }
            Err(e) => {
                error!(store_url = %store_url, error = %e, "Index store health check failed");
                return Err(IndexingError::store_unavailable(
                    store_url.as_str(),
                    e.to_string(),
                ));
            }
        }

        // Initialize loader with search client
        let loader =
            IndexLoader::with_config(client, settings.index.clone(), settings.loader.clone());

        if settings.create_index {
            loader.ensure_index().await?;
            info!(index = %settings.index, "Index ready");
        }

        let source = match &settings.input {
            InputSource::File(path) => LineSource::open(path).await?.boxed(),
            InputSource::Stdin => LineSource::stdin().boxed(),
        };

        // Create orchestrator
        let orchestrator = Orchestrator::new(LineParser::new(), loader);

        Ok(Self {
            orchestrator,
            source,
        })
    }
}
