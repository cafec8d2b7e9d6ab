//! Processor module for the log indexer pipeline.
//!
//! Turns raw lines into structured records.

mod line_parser;
pub mod timestamp;

pub use line_parser::LineParser;
