//! Configuration and dependency wiring for the log indexer.

pub mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    Cli, InputSource, LogFormat, Settings, DEFAULT_HOST, DEFAULT_INDEX, DEFAULT_PORT,
};
