//! A mailer that keeps messages in memory instead of delivering them

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::Mailer;
use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub source: String,
    pub destinations: Vec<String>,
    pub raw: Vec<u8>,
}

impl SentMessage {
    pub fn raw_text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    rejection: Option<String>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox whose transport rejects every message with `reason`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for Outbox {
    async fn send_raw(&self, source: &str, destinations: &[String], raw: &[u8]) -> ReportResult<()> {
        if let Some(reason) = &self.rejection {
            return Err(ReportError::notification(reason));
        }

        self.sent.lock().await.push(SentMessage {
            source: source.to_owned(),
            destinations: destinations.to_vec(),
            raw: raw.to_vec(),
        });
        Ok(())
    }
}
