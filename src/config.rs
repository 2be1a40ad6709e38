//! Run configuration sourced from environment variables

use crate::error::{ReportError, ReportResult};
use crate::records::Dataset;

pub const DATA_BUCKET: &str = "DATA_BUCKET";
pub const REPORTS_BUCKET: &str = "REPORTS_BUCKET";
pub const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
pub const SALES_KEY: &str = "SALES_KEY";
pub const INVENTORY_KEY: &str = "INVENTORY_KEY";
pub const AWS_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bucket holding the sales and inventory tables
    pub data_bucket: String,
    /// Bucket receiving generated reports
    pub reports_bucket: String,
    /// Sender and sole recipient of the notification
    pub email_address: String,
    pub sales: Dataset,
    pub inventory: Dataset,
    /// Overrides the AWS endpoint, for S3-compatible services
    pub endpoint_url: Option<String>,
}

impl Config {
    pub fn from_env() -> ReportResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> ReportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| {
            optional(name).ok_or_else(|| {
                ReportError::config(format!("environment variable {} is not set", name))
            })
        };

        Ok(Self {
            data_bucket: required(DATA_BUCKET)?,
            reports_bucket: required(REPORTS_BUCKET)?,
            email_address: required(EMAIL_ADDRESS)?,
            sales: Dataset::sales(
                optional(SALES_KEY).unwrap_or_else(|| Dataset::DEFAULT_SALES_KEY.to_owned()),
            ),
            inventory: Dataset::inventory(
                optional(INVENTORY_KEY)
                    .unwrap_or_else(|| Dataset::DEFAULT_INVENTORY_KEY.to_owned()),
            ),
            endpoint_url: optional(AWS_ENDPOINT_URL),
        })
    }
}
