//! Interface definitions for the document store client.
//!
//! This module defines the abstract `DocumentIndexClient` trait that allows
//! the pipeline to be handed any store implementation, including test doubles.

mod document_index_client;

pub use document_index_client::DocumentIndexClient;
