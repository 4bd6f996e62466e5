//! S3-compatible object storage backed by the `minio` client.

use super::service::{ObjectStorage, StorageError};
use crate::config::S3Config;
use async_trait::async_trait;
use minio::s3::args::{BucketExistsArgs, MakeBucketArgs, PutObjectArgs, RemoveObjectArgs};
use minio::s3::client::{Client, ClientBuilder};
use minio::s3::creds::StaticProvider;
use minio::s3::http::BaseUrl;
use std::io::Cursor;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct MinioStorage {
    client: Client,
    bucket: String,
    public_url: String,
}

impl MinioStorage {
    /// Connects to the endpoint and creates the bucket if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Config`] for an unusable endpoint and
    /// [`StorageError::Operation`] if the bucket cannot be checked or created.
    #[instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket))]
    pub async fn connect(config: &S3Config) -> Result<Self, StorageError> {
        let base_url = config
            .endpoint_url()
            .parse::<BaseUrl>()
            .map_err(|e| StorageError::Config(format!("Invalid endpoint URL: {}", e)))?;

        let provider = StaticProvider::new(&config.access_key, &config.secret_key, None);

        let client = ClientBuilder::new(base_url)
            .provider(Some(Box::new(provider)))
            .build()
            .map_err(|e| StorageError::Config(format!("Client creation failed: {}", e)))?;

        let storage = Self {
            client,
            bucket: config.bucket.clone(),
            public_url: config.public_url.clone(),
        };
        storage.ensure_bucket().await?;

        info!("Object storage initialized");
        Ok(storage)
    }

    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        let exists_args = BucketExistsArgs::new(&self.bucket)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;

        let exists = self
            .client
            .bucket_exists(&exists_args)
            .await
            .map_err(|e| StorageError::Operation(format!("Bucket exists check failed: {}", e)))?;

        if exists {
            return Ok(());
        }

        warn!(bucket = %self.bucket, "Bucket does not exist, creating it");

        let make_args = MakeBucketArgs::new(&self.bucket)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;

        self.client
            .make_bucket(&make_args)
            .await
            .map_err(|e| StorageError::Operation(format!("Bucket creation failed: {}", e)))?;

        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, self.bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for MinioStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let object = key.to_string();
        let content_type = content_type.to_string();

        // PutObjectArgs borrows a synchronous reader, so the upload runs on the blocking pool.
        tokio::task::spawn_blocking(move || {
            let mut reader = Cursor::new(bytes);
            let size = reader.get_ref().len();

            let mut args = PutObjectArgs::new(&bucket, &object, &mut reader, Some(size), None)
                .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;
            args.content_type = &content_type;

            futures::executor::block_on(client.put_object(&mut args))
                .map_err(|e| StorageError::Operation(format!("Upload failed: {}", e)))?;

            Ok::<(), StorageError>(())
        })
        .await
        .map_err(|e| StorageError::Operation(format!("Join error: {}", e)))??;

        debug!(key = %key, "Object uploaded");
        Ok(self.object_url(key))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let args = RemoveObjectArgs::new(&self.bucket, key)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;

        self.client
            .remove_object(&args)
            .await
            .map_err(|e| StorageError::Operation(format!("Delete failed: {}", e)))?;

        debug!(key = %key, "Object deleted");
        Ok(())
    }
}
