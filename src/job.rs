//! One report run, from input tables to notification

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::dispatcher::{self, ReportLocation};
use crate::error::ReportResult;
use crate::loader;
use crate::mail::Mailer;
use crate::report;
use crate::storage::BlobStore;

/// What the invoking runtime gets back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    /// JSON-encoded message
    pub body: String,
}

impl InvocationResponse {
    fn new(status_code: u16, message: &str) -> Self {
        // A JSON string literal; serializing a &str cannot fail.
        let body = serde_json::to_string(message).unwrap_or_else(|_| format!("\"{}\"", message));
        Self { status_code, body }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

pub struct ReportJob {
    config: Config,
    store: Arc<dyn BlobStore>,
    mailer: Arc<dyn Mailer>,
}

impl ReportJob {
    pub fn new(config: Config, store: Arc<dyn BlobStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            store,
            mailer,
        }
    }

    /// Loads, builds, stores and mails the report. The first failure aborts
    /// the remaining steps; a report stored before a failed send stays stored.
    pub async fn run(&self, generated_at: DateTime<Utc>) -> ReportResult<ReportLocation> {
        let inputs = loader::load_inputs(
            self.store.as_ref(),
            &self.config.data_bucket,
            &self.config.sales,
            &self.config.inventory,
        )
        .await?;

        let report_text = report::generate_report(&inputs.sales, &inputs.inventory)?;

        let location = dispatcher::publish(
            self.store.as_ref(),
            &self.config.reports_bucket,
            &report_text,
            generated_at,
        )
        .await?;

        dispatcher::notify(
            self.mailer.as_ref(),
            &self.config.email_address,
            &report_text,
            &location,
            generated_at,
        )
        .await?;

        Ok(location)
    }

    /// Runs the job and folds the outcome into a status code and message.
    pub async fn handle(&self, generated_at: DateTime<Utc>) -> InvocationResponse {
        match self.run(generated_at).await {
            Ok(location) => {
                info!("Report generated successfully: {}", location.key);
                InvocationResponse::new(
                    200,
                    &format!("Report generated successfully: {}", location.key),
                )
            }
            Err(e) => {
                error!("Error generating report: {}", e);
                InvocationResponse::new(500, &format!("Error generating report: {}", e))
            }
        }
    }
}
