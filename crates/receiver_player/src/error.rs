//! Error types for loading player configuration

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for a player config
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values out of range
    #[error("Invalid player configuration: {0}")]
    Invalid(String),
}

/// Result type for config loading
pub type Result<T> = std::result::Result<T, ConfigError>;
