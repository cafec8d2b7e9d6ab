//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::IndexingError;
use log_indexer_pipeline::loader::LoaderConfig;

/// Default store host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default store port.
pub const DEFAULT_PORT: u16 = 9200;

/// Default target index.
pub const DEFAULT_INDEX: &str = "application_logs";

/// Output format for diagnostic logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "log-indexer")]
#[command(about = "Custom log parser and OpenSearch/Elasticsearch indexer", long_about = None)]
pub struct Cli {
    /// Path to the log file to parse ("-" reads standard input)
    #[arg(env = "LOG_FILE")]
    pub log_file: PathBuf,

    /// Store host address
    #[arg(long, alias = "es_host", env = "ES_HOST", default_value = DEFAULT_HOST)]
    pub es_host: String,

    /// Store port
    #[arg(long, alias = "es_port", env = "ES_PORT", default_value_t = DEFAULT_PORT)]
    pub es_port: u16,

    /// Store URL scheme
    #[arg(long, env = "ES_SCHEME", default_value = "http", value_parser = ["http", "https"])]
    pub es_scheme: String,

    /// Target index name
    #[arg(long, env = "ES_INDEX", default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Create the index with log record mappings if it does not exist
    #[arg(long, env = "ES_CREATE_INDEX")]
    pub create_index: bool,

    /// Retries per document for transient store failures
    #[arg(long, env = "INDEX_MAX_RETRIES", default_value_t = 0)]
    pub max_retries: u32,

    /// Initial delay between retries, in milliseconds
    #[arg(long, env = "INDEX_RETRY_DELAY_MS", default_value_t = 100)]
    pub retry_delay_ms: u64,

    /// Diagnostic log format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Where log lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file on disk.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Source of log lines.
    pub input: InputSource,
    /// Store host.
    pub host: String,
    /// Store port.
    pub port: u16,
    /// Store URL scheme (`http` or `https`).
    pub scheme: String,
    /// Target index name.
    pub index: String,
    /// Whether to create the index before processing.
    pub create_index: bool,
    /// Loader retry behaviour.
    pub loader: LoaderConfig,
    /// Diagnostic log format.
    pub log_format: LogFormat,
}

impl Settings {
    /// Validate command-line arguments into settings.
    pub fn from_cli(cli: Cli) -> Result<Self, IndexingError> {
        let host = cli.es_host.trim().to_string();
        if host.is_empty() {
            return Err(IndexingError::config("Store host must not be empty"));
        }

        validate_index_name(&cli.index)?;

        let input = if cli.log_file.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(cli.log_file)
        };

        let loader = LoaderConfig {
            max_retries: cli.max_retries,
            initial_retry_delay_ms: cli.retry_delay_ms,
            ..LoaderConfig::default()
        };

        Ok(Self {
            input,
            host,
            port: cli.es_port,
            scheme: cli.es_scheme,
            index: cli.index,
            create_index: cli.create_index,
            loader,
            log_format: cli.log_format,
        })
    }

    /// Build the store URL from scheme, host and port.
    pub fn store_url(&self) -> Result<Url, IndexingError> {
        // Bare IPv6 addresses need brackets inside a URL
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        let url = Url::parse(&format!("{}://{}:{}", self.scheme, host, self.port))
            .map_err(|e| IndexingError::config(format!("Invalid store address {}: {}", host, e)))?;

        if url.path() != "/" || url.query().is_some() {
            return Err(IndexingError::config(format!(
                "Invalid store address {}: host must not contain a path",
                host
            )));
        }

        Ok(url)
    }
}

/// Reject index names the store would refuse.
fn validate_index_name(index: &str) -> Result<(), IndexingError> {
    if index.is_empty() {
        return Err(IndexingError::config("Index name must not be empty"));
    }
    if index.starts_with(['-', '_', '+']) {
        return Err(IndexingError::config(format!(
            "Index name {} must not start with '-', '_' or '+'",
            index
        )));
    }
    if index.chars().any(|c| {
        c.is_uppercase() || c.is_whitespace() || "\\/*?\"<>|,#:".contains(c)
    }) {
        return Err(IndexingError::config(format!(
            "Index name {} must be lowercase without spaces or special characters",
            index
        )));
    }
    Ok(())
}
