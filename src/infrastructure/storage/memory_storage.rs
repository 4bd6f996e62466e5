//! In-memory object storage used when S3 is not configured.

use super::service::{ObjectStorage, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Keeps uploaded objects in a map.
///
/// Returned URLs use the `memory://` scheme and are not reachable over HTTP.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes uploads fail with an operation error.
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Makes deletes fail with an operation error.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(key))
            .unwrap_or(false)
    }

    /// Content type of a stored object.
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(key).map(|(ct, _)| ct.clone()))
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Operation("memory storage is failing".to_string()));
        }

        self.objects
            .lock()
            .map_err(|_| StorageError::Operation("storage lock poisoned".to_string()))?
            .insert(key.to_string(), (content_type.to_string(), bytes));

        debug!(key = %key, "Object stored in memory");
        Ok(format!("memory://{}", key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Operation("memory storage is failing".to_string()));
        }

        self.objects
            .lock()
            .map_err(|_| StorageError::Operation("storage lock poisoned".to_string()))?
            .remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_delete() {
        let storage = MemoryStorage::new();
        let url = storage
            .put("category/a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "memory://category/a.png");
        assert!(storage.contains("category/a.png"));
        assert_eq!(
            storage.content_type("category/a.png").as_deref(),
            Some("image/png")
        );

        storage.delete("category/a.png").await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        assert!(MemoryStorage::new().delete("nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let storage = MemoryStorage::new();
        storage.set_fail_puts(true);
        assert!(storage.put("k", vec![1], "image/png").await.is_err());

        storage.set_fail_puts(false);
        storage.put("k", vec![1], "image/png").await.unwrap();
        storage.set_fail_deletes(true);
        assert!(storage.delete("k").await.is_err());
        assert!(storage.contains("k"));
    }
}
