//! Storage abstraction trait
//!
//! All attachment backends must implement this trait. The dispatcher works
//! against it, so tests can swap in a temp-dir backend without touching the
//! gate.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store failed: {0}")]
    StoreFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Attachment storage backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a file under the given (already generated) name.
    ///
    /// Returns the absolute path of the stored file.
    async fn store(&self, stored_name: &str, data: Bytes) -> StorageResult<PathBuf>;

    /// Delete a stored file by name. Used to clean up after a failed
    /// dispatch; deleting an already-absent file is not an error.
    async fn delete(&self, stored_name: &str) -> StorageResult<()>;

    /// Check whether a stored file exists.
    async fn exists(&self, stored_name: &str) -> StorageResult<bool>;
}
