//! Error types for EVP

use thiserror::Error;

/// Result type alias for EVP operations
pub type Result<T> = std::result::Result<T, EvpError>;

/// Main error type for EVP
#[derive(Error, Debug)]
pub enum EvpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
