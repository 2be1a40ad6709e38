//! Stores the finished report and mails it out

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::info;

use crate::error::ReportResult;
use crate::mail::{Attachment, Mailer, Message};
use crate::storage::BlobStore;

pub const REPORT_CONTENT_TYPE: &str = "text/csv";

/// Where a report blob was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLocation {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for ReportLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// `reports/daily_report_<YYYYMMDD_HHMMSS>.csv`
pub fn report_key(generated_at: DateTime<Utc>) -> String {
    format!(
        "reports/daily_report_{}.csv",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub async fn publish(
    store: &dyn BlobStore,
    bucket: &str,
    report_text: &str,
    generated_at: DateTime<Utc>,
) -> ReportResult<ReportLocation> {
    let key = report_key(generated_at);
    store
        .put(
            bucket,
            &key,
            report_text.as_bytes().to_vec(),
            REPORT_CONTENT_TYPE,
        )
        .await?;

    let location = ReportLocation {
        bucket: bucket.to_owned(),
        key,
    };
    info!("Stored report at {}", location);
    Ok(location)
}

/// Builds the notification email carrying the report as a CSV attachment.
pub fn report_message(
    recipient: &str,
    report_text: &str,
    location: &ReportLocation,
    generated_at: DateTime<Utc>,
) -> Message {
    let body = format!(
        "Dear Team,\n\
         \n\
         Please find attached the daily business report generated on {} UTC.\n\
         \n\
         Report includes:\n\
         - Sales summary by product\n\
         - Inventory levels by product\n\
         - Sales ratio analysis\n\
         \n\
         This report has been automatically generated and stored at: {}\n\
         \n\
         Best regards,\n\
         Automated Reporting System\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        location,
    );

    Message {
        from: recipient.to_owned(),
        to: recipient.to_owned(),
        subject: format!("Daily Business Report - {}", generated_at.format("%Y-%m-%d")),
        date: generated_at,
        body,
        attachments: vec![Attachment {
            filename: format!("daily_report_{}.csv", generated_at.format("%Y%m%d")),
            content_type: REPORT_CONTENT_TYPE.to_owned(),
            data: report_text.as_bytes().to_vec(),
        }],
    }
}

pub async fn notify(
    mailer: &dyn Mailer,
    recipient: &str,
    report_text: &str,
    location: &ReportLocation,
    generated_at: DateTime<Utc>,
) -> ReportResult<()> {
    let message = report_message(recipient, report_text, location, generated_at);
    let raw = message.render();

    mailer
        .send_raw(recipient, &[recipient.to_owned()], raw.as_bytes())
        .await?;

    info!("Sent report notification to {}", recipient);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::mail::Outbox;
    use crate::storage::MemoryBlobStore;
    use chrono::TimeZone;

    const REPORT: &str = "Product,Total Sales,Total Inventory,Sales Ratio\nWidget,150,40,3.75\n";

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()
    }

    fn location() -> ReportLocation {
        ReportLocation {
            bucket: "acme-reports".to_string(),
            key: report_key(generated_at()),
        }
    }

    #[test]
    fn key_carries_timestamp() {
        assert_eq!(
            report_key(generated_at()),
            "reports/daily_report_20240305_070809.csv"
        );
        assert_eq!(
            location().to_string(),
            "s3://acme-reports/reports/daily_report_20240305_070809.csv"
        );
    }

    #[tokio::test]
    async fn publish_writes_csv_blob() {
        let store = MemoryBlobStore::new();
        let stored = publish(&store, "acme-reports", REPORT, generated_at())
            .await
            .unwrap();

        assert_eq!(stored, location());
        let blob = store.blob("acme-reports", &stored.key).await.unwrap();
        assert_eq!(blob.body, REPORT.as_bytes());
        assert_eq!(blob.content_type, "text/csv");
    }

    #[tokio::test]
    async fn publish_surfaces_rejected_write() {
        let store = MemoryBlobStore::read_only();
        let err = publish(&store, "acme-reports", REPORT, generated_at())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::StorageWrite { .. }));
    }

    #[test]
    fn message_describes_run() {
        let message = report_message("ops@example.com", REPORT, &location(), generated_at());

        assert_eq!(message.from, "ops@example.com");
        assert_eq!(message.to, "ops@example.com");
        assert_eq!(message.subject, "Daily Business Report - 2024-03-05");
        assert!(message.body.contains("generated on 2024-03-05 07:08:09 UTC"));
        assert!(message
            .body
            .contains("stored at: s3://acme-reports/reports/daily_report_20240305_070809.csv"));

        let attachment = &message.attachments[0];
        assert_eq!(attachment.filename, "daily_report_20240305.csv");
        assert_eq!(attachment.content_type, "text/csv");
        assert_eq!(attachment.data, REPORT.as_bytes());
    }

    #[tokio::test]
    async fn notify_sends_to_self() {
        let outbox = Outbox::new();
        notify(&outbox, "ops@example.com", REPORT, &location(), generated_at())
            .await
            .unwrap();

        let sent = outbox.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].source, "ops@example.com");
        assert_eq!(sent[0].destinations, vec!["ops@example.com".to_string()]);

        let raw = sent[0].raw_text();
        assert!(raw.contains("From: ops@example.com\r\n"));
        assert!(raw.contains("To: ops@example.com\r\n"));
        assert!(raw.contains("filename=\"daily_report_20240305.csv\""));
    }

    #[tokio::test]
    async fn notify_surfaces_transport_rejection() {
        let outbox = Outbox::rejecting("address not verified");
        let err = notify(&outbox, "ops@example.com", REPORT, &location(), generated_at())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::Notification(ref m) if m == "address not verified"));
    }
}
