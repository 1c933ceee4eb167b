//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while assembling or persisting audit records.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to open or initialize a store backend.
    #[error("failed to initialize audit store: {0}")]
    InitializationFailed(String),

    /// Store-level failure while appending or reading records.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
