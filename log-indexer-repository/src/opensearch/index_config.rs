//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for log record indices.

use serde_json::{json, Value};

/// Date format of timestamps that could not be normalized and were stored as
/// they appeared in the log line.
pub const RAW_TIMESTAMP_FORMAT: &str = "yyyy-MM-dd HH:mm:ss,SSS";

/// Get the index settings and mappings for a log record index.
///
/// The configuration includes:
/// - **timestamp**: `date`, accepting canonical ISO-8601 values and the raw
///   log-line form
/// - **level**: `keyword`, for exact filtering and aggregations
/// - **message**: `text`, for full-text search
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "timestamp": {
                    "type": "date",
                    "format": format!("strict_date_optional_time||{}", RAW_TIMESTAMP_FORMAT)
                },
                "level": {
                    "type": "keyword"
                },
                "message": {
                    "type": "text"
                }
            }
        }
    })
}
