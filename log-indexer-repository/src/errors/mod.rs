//! Error types for the log indexer repository.

mod search_error;

pub use search_error::SearchError;
