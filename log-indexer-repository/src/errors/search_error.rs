//! Search error types.
//!
//! This module defines the error types that can occur while talking to the
//! document store.

use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The store could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The store rejected a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to create the target index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse a response from the store.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a document for the store.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}
