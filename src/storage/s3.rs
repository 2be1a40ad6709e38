//! S3 blob store

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use super::BlobStore;
use crate::error::{ReportError, ReportResult};

/// S3 blob store
pub struct S3BlobStore {
    client: Client,
}

impl S3BlobStore {
    /// Create a store from shared AWS configuration. A custom endpoint
    /// (S3-compatible services, local stacks) switches to path-style addressing.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(sdk_config.endpoint_url().is_some())
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, bucket: &str, key: &str) -> ReportResult<Vec<u8>> {
        debug!("Fetching s3://{}/{}", bucket, key);

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .is_some_and(|service| service.is_no_such_key());
                if missing {
                    ReportError::retrieval(key, format!("no such key in bucket {}", bucket))
                } else {
                    ReportError::retrieval(key, DisplayErrorContext(&e))
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ReportError::retrieval(key, format!("failed to read body: {}", e)))?
            .into_bytes();

        Ok(bytes.to_vec())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> ReportResult<()> {
        debug!("Writing {} bytes to s3://{}/{}", body.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| ReportError::storage_write(key, DisplayErrorContext(&e)))?;

        Ok(())
    }
}
