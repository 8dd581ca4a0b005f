//! Store error types.

use thiserror::Error;
use yescode_fetch::KeychainError;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential storage error.
    #[error("Credential error: {0}")]
    Credential(#[from] KeychainError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
