//! OpenSearch implementation of the document index client.
//!
//! This module provides a concrete implementation of `DocumentIndexClient`
//! using OpenSearch as the backend.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::{index_settings, RAW_TIMESTAMP_FORMAT};
