//! Amazon SES transport

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use aws_sdk_ses::Client;
use tracing::debug;

use super::Mailer;
use crate::error::{ReportError, ReportResult};

/// Sends raw MIME messages through SES `SendRawEmail`
pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send_raw(&self, source: &str, destinations: &[String], raw: &[u8]) -> ReportResult<()> {
        let message = RawMessage::builder()
            .data(Blob::new(raw))
            .build()
            .map_err(ReportError::notification)?;

        let output = self
            .client
            .send_raw_email()
            .source(source)
            .set_destinations(Some(destinations.to_vec()))
            .raw_message(message)
            .send()
            .await
            .map_err(|e| ReportError::notification(DisplayErrorContext(&e)))?;

        debug!("SES accepted message {:?}", output.message_id());
        Ok(())
    }
}
