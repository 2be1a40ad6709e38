//! Fetches the input tables from storage

use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};
use crate::records::Dataset;
use crate::storage::BlobStore;

/// Raw text of both input tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub sales: String,
    pub inventory: String,
}

/// Fetches one dataset and decodes it as UTF-8.
pub async fn load(store: &dyn BlobStore, bucket: &str, dataset: &Dataset) -> ReportResult<String> {
    let bytes = store.get(bucket, &dataset.key).await?;
    debug!("Fetched {} bytes from {}/{}", bytes.len(), bucket, dataset.key);

    String::from_utf8(bytes).map_err(|e| ReportError::retrieval(&dataset.key, e))
}

pub async fn load_inputs(
    store: &dyn BlobStore,
    bucket: &str,
    sales: &Dataset,
    inventory: &Dataset,
) -> ReportResult<Inputs> {
    info!("Loading sales and inventory from {}", bucket);

    Ok(Inputs {
        sales: load(store, bucket, sales).await?,
        inventory: load(store, bucket, inventory).await?,
    })
}
