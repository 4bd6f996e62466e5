//! Object storage for uploaded images.
//!
//! Provides an [`ObjectStorage`] trait with two implementations:
//! - [`MinioStorage`] - S3-compatible storage (MinIO, AWS S3, ...)
//! - [`MemoryStorage`] - In-memory store for development and tests

mod memory_storage;
mod minio_storage;
mod service;

pub use memory_storage::MemoryStorage;
pub use minio_storage::MinioStorage;
pub use service::{ObjectStorage, StorageError};

#[cfg(test)]
pub use service::MockObjectStorage;
