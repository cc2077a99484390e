//! CLI error types

use permit_types::PermitError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine or domain error
    #[error(transparent)]
    Permit(#[from] PermitError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
