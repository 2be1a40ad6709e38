//! In-memory blob store for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::BlobStore;
use crate::error::{ReportError, ReportResult};

/// A blob and the content type it was written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory blob store keyed by `(bucket, key)`
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<(String, String), StoredBlob>>>,
    read_only: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Seed a blob without going through the trait
    pub async fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.blobs.write().await.insert(
            (bucket.to_owned(), key.to_owned()),
            StoredBlob {
                body: body.into(),
                content_type: "application/octet-stream".to_owned(),
            },
        );
    }

    pub async fn blob(&self, bucket: &str, key: &str) -> Option<StoredBlob> {
        self.blobs
            .read()
            .await
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Keys in `bucket`, sorted
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .blobs
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> ReportResult<Vec<u8>> {
        self.blob(bucket, key)
            .await
            .map(|blob| blob.body)
            .ok_or_else(|| ReportError::retrieval(key, format!("no such key in bucket {}", bucket)))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> ReportResult<()> {
        if self.read_only {
            return Err(ReportError::storage_write(key, "store is read-only"));
        }

        self.blobs.write().await.insert(
            (bucket.to_owned(), key.to_owned()),
            StoredBlob {
                body,
                content_type: content_type.to_owned(),
            },
        );
        Ok(())
    }
}
