//! # Log Indexer Repository
//!
//! This crate provides the interface the ingestion pipeline uses to hand
//! parsed records to a document store, and a concrete implementation for
//! OpenSearch (and Elasticsearch-compatible) clusters.

pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use errors::SearchError;
pub use interfaces::DocumentIndexClient;
pub use opensearch::OpenSearchClient;
