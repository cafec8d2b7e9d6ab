//! # Log Indexer Pipeline
//!
//! This crate provides the pipeline components for reading log lines,
//! turning them into structured records and indexing them into a document
//! store.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Reads raw lines, one at a time
//! 2. **Processor**: Matches each line and normalizes its timestamp
//! 3. **Loader**: Indexes records into the store
//! 4. **Orchestrator**: Drives lines through the pipeline in arrival order
//!    and reports each outcome

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod report;
pub mod source;

pub use errors::PipelineError;
pub use orchestrator::Orchestrator;
pub use report::{ConsoleReporter, LineReport, Reporter, Summary};
