//! Outgoing email: MIME composition and the transport that delivers it

use async_trait::async_trait;

use crate::error::ReportResult;

pub mod message;
pub mod outbox;
pub mod ses;

pub use message::{Attachment, Message};
pub use outbox::Outbox;
pub use ses::SesMailer;

/// A transport that accepts fully rendered MIME messages
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Submit `raw` for delivery from `source` to every address in `destinations`
    async fn send_raw(&self, source: &str, destinations: &[String], raw: &[u8]) -> ReportResult<()>;
}
