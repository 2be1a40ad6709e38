//! Object storage used for the input tables and the generated report

use async_trait::async_trait;

use crate::error::ReportResult;

pub mod memory;
pub mod s3;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// Named blobs grouped in buckets
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the full contents of a blob. A missing blob is a retrieval error.
    async fn get(&self, bucket: &str, key: &str) -> ReportResult<Vec<u8>>;

    /// Create or replace a blob
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> ReportResult<()>;
}
