//! Object storage trait and error types.

use async_trait::async_trait;

/// Errors that can occur during object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Invalid storage arguments: {0}")]
    InvalidArguments(String),

    #[error("Storage operation failed: {0}")]
    Operation(String),
}

/// Trait for storing publicly reachable binary objects such as category images.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::MinioStorage`] - S3-compatible storage
/// - [`crate::infrastructure::storage::MemoryStorage`] - In-memory store when S3 is not configured
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores an object under `key` and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the upload fails.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<String, StorageError>;

    /// Removes the object stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the request.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
