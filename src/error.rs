//! Error types for a report run

use std::fmt;
use thiserror::Error;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Every failure that aborts a run
#[derive(Error, Debug)]
pub enum ReportError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An input blob could not be fetched or decoded
    #[error("Failed to retrieve {key}: {message}")]
    Retrieval { key: String, message: String },

    /// An input row could not be read
    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    /// The joined report could not be rendered as CSV
    #[error("Failed to render report: {0}")]
    Render(String),

    /// The report blob could not be written
    #[error("Failed to store {key}: {message}")]
    StorageWrite { key: String, message: String },

    /// The email transport rejected the message
    #[error("Failed to send notification: {0}")]
    Notification(String),
}

impl ReportError {
    pub fn config<E: fmt::Display>(msg: E) -> Self {
        Self::Config(msg.to_string())
    }

    pub fn retrieval<E: fmt::Display>(key: &str, err: E) -> Self {
        Self::Retrieval {
            key: key.to_owned(),
            message: err.to_string(),
        }
    }

    pub fn malformed_row<E: fmt::Display>(line: u64, err: E) -> Self {
        Self::MalformedRow {
            line,
            message: err.to_string(),
        }
    }

    pub fn render<E: fmt::Display>(err: E) -> Self {
        Self::Render(err.to_string())
    }

    pub fn storage_write<E: fmt::Display>(key: &str, err: E) -> Self {
        Self::StorageWrite {
            key: key.to_owned(),
            message: err.to_string(),
        }
    }

    pub fn notification<E: fmt::Display>(err: E) -> Self {
        Self::Notification(err.to_string())
    }
}
