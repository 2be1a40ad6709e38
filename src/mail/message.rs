use base64::Engine;
use chrono::{DateTime, Utc};

const LINE_BREAK: &str = "\r\n";
const BASE64_LINE_LEN: usize = 76;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A plain-text email with optional attachments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Renders the message as `multipart/mixed` with a fresh boundary.
    pub fn render(&self) -> String {
        let boundary = format!("=_report_{}", uuid::Uuid::new_v4().simple());
        self.render_with_boundary(&boundary)
    }

    pub fn render_with_boundary(&self, boundary: &str) -> String {
        let mut out = String::new();
        push_line(&mut out, &format!("From: {}", self.from));
        push_line(&mut out, &format!("To: {}", self.to));
        push_line(&mut out, &format!("Subject: {}", self.subject));
        push_line(&mut out, &format!("Date: {}", self.date.to_rfc2822()));
        push_line(&mut out, "MIME-Version: 1.0");
        push_line(
            &mut out,
            &format!("Content-Type: multipart/mixed; boundary=\"{}\"", boundary),
        );
        push_line(&mut out, "");

        push_line(&mut out, &format!("--{}", boundary));
        push_line(&mut out, "Content-Type: text/plain; charset=\"utf-8\"");
        push_line(&mut out, "Content-Transfer-Encoding: 8bit");
        push_line(&mut out, "");
        for line in self.body.lines() {
            push_line(&mut out, line);
        }

        for attachment in &self.attachments {
            push_line(&mut out, &format!("--{}", boundary));
            push_line(
                &mut out,
                &format!(
                    "Content-Type: {}; name=\"{}\"",
                    attachment.content_type, attachment.filename
                ),
            );
            push_line(&mut out, "Content-Transfer-Encoding: base64");
            push_line(
                &mut out,
                &format!(
                    "Content-Disposition: attachment; filename=\"{}\"",
                    attachment.filename
                ),
            );
            push_line(&mut out, "");
            push_base64(&mut out, &attachment.data);
        }

        push_line(&mut out, &format!("--{}--", boundary));
        out
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(LINE_BREAK);
}

fn push_base64(out: &mut String, data: &[u8]) {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    for chunk in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
        push_line(out, &String::from_utf8_lossy(chunk));
    }
}
