//! # Log Indexer Shared
//!
//! Record types passed between the line parser, the pipeline and the
//! document store client.

mod line;
mod record;
mod timestamp;

pub use line::RawLine;
pub use record::{ParseOutcome, ParsedRecord};
pub use timestamp::{LogTimestamp, CANONICAL_TIMESTAMP_FORMAT};
