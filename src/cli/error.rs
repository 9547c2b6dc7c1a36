//! CLI error types and conversions

use crate::config::ConfigError;
use crate::error::GiphyError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// API or transport failure
    #[error("request failed: {0}")]
    Giphy(#[from] GiphyError),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output could not be serialized
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Gave up after repeated transient failures
    #[error("giving up after {retries} retries: {last_error}")]
    RetriesExhausted {
        /// Retries attempted
        retries: u32,
        /// Most recent failure
        last_error: GiphyError,
    },

    /// Metrics exporter could not start
    #[error("metrics error: {0}")]
    Metrics(String),
}
