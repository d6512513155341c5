//! CLI error types

use blackbox_engine::{FingerprintError, TransportError};
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Engine setup error
    #[error(transparent)]
    Engine(#[from] FingerprintError),

    /// Transport error outside a probe
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
