//! Timestamp values carried by parsed records.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Canonical rendering of a normalized timestamp: ISO-8601 date and time with
/// microsecond precision and no offset, e.g. `2024-06-13T12:34:56.789000`.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A record timestamp, either normalized or kept as it appeared in the line.
///
/// Both variants serialize to a plain string so the indexed document shape
/// does not depend on whether normalization succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTimestamp {
    /// The timestamp parsed into a calendar date-time.
    Normalized(NaiveDateTime),
    /// The original text, kept because it could not be parsed.
    FallbackRaw(String),
}

impl LogTimestamp {
    /// Whether normalization failed and the raw text was kept.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FallbackRaw(_))
    }

    /// The string stored in the index for this timestamp.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalized(dt) => write!(f, "{}", dt.format(CANONICAL_TIMESTAMP_FORMAT)),
            Self::FallbackRaw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for LogTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
