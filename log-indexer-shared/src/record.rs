//! Parsed log records.

use serde::Serialize;

use crate::timestamp::LogTimestamp;

/// The structured form of one log line: exactly `timestamp`, `level` and
/// `message`.
///
/// This is also the document body sent to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    timestamp: LogTimestamp,
    level: String,
    message: String,
}

impl ParsedRecord {
    /// Create a new record.
    pub fn new(timestamp: LogTimestamp, level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level: level.into(),
            message: message.into(),
        }
    }

    /// The record timestamp.
    pub fn timestamp(&self) -> &LogTimestamp {
        &self.timestamp
    }

    /// The uppercase level token, e.g. `INFO`.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Everything after the level separator.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of matching one line against the log pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The line matched and produced a record.
    Matched(ParsedRecord),
    /// The line did not match; carries the trimmed line text.
    Unmatched(String),
}
