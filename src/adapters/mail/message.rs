//! Transport-independent notification and MIME composition

use crate::domain::{MailError, Result};
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use std::path::{Path, PathBuf};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// Delivery priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// An email to send
///
/// Empty collections are omitted from the message: no `Bcc` header without
/// bcc addresses, no multipart body without attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub priority: Priority,
    pub html_body: Vec<String>,
    pub attachments: Vec<PathBuf>,
    pub save_path: Option<PathBuf>,
}

impl Notification {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn with_to(mut self, to: &[String]) -> Self {
        self.to = to.to_vec();
        self
    }

    pub fn with_bcc(mut self, bcc: &[String]) -> Self {
        self.bcc = bcc.to_vec();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_body_part(mut self, html: impl Into<String>) -> Self {
        self.html_body.push(html.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    /// Concatenated HTML body
    pub fn html(&self) -> String {
        self.html_body.concat()
    }

    /// Writes the HTML body to the save path, if any
    pub async fn save_copy(&self) -> Result<()> {
        let Some(path) = &self.save_path else {
            return Ok(());
        };
        tokio::fs::write(path, self.html())
            .await
            .map_err(|e| MailError::SaveFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), "Message copy saved");
        Ok(())
    }

    /// Saves the copy of a message that has already been delivered
    ///
    /// The delivery stands even when the copy cannot be written, so the
    /// failure is only logged.
    pub async fn keep_copy(&self) {
        if let Err(e) = self.save_copy().await {
            tracing::warn!(
                subject = %self.subject,
                error = %e,
                "Message delivered but its copy could not be saved"
            );
        }
    }
}

/// `X-Priority` header, set on high-priority messages
#[derive(Debug, Clone, Copy)]
struct XPriority;

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(_: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self)
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), "1 (Highest)".to_string())
    }
}

fn mailbox(address: &str) -> std::result::Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

fn content_type_for(path: &Path) -> std::result::Result<ContentType, MailError> {
    let raw = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => XLSX_CONTENT_TYPE,
        _ => BINARY_CONTENT_TYPE,
    };
    ContentType::parse(raw).map_err(|e| MailError::BuildFailed(e.to_string()))
}

async fn attachment_part(path: &Path) -> std::result::Result<SinglePart, MailError> {
    let attachment_error = |message: String| MailError::Attachment {
        path: path.display().to_string(),
        message,
    };

    let body = tokio::fs::read(path)
        .await
        .map_err(|e| attachment_error(e.to_string()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| attachment_error("path has no file name".to_string()))?
        .to_string();

    Ok(Attachment::new(filename).body(body, content_type_for(path)?))
}

/// Builds the MIME message for `notification`
///
/// # Errors
///
/// [`MailError::NoRecipients`] when `to` and `bcc` are both empty;
/// address, attachment and build failures otherwise.
pub async fn compose(from: &Mailbox, notification: &Notification) -> Result<Message> {
    if notification.to.is_empty() && notification.bcc.is_empty() {
        return Err(MailError::NoRecipients.into());
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(notification.subject.as_str());
    for address in &notification.to {
        builder = builder.to(mailbox(address)?);
    }
    for address in &notification.bcc {
        builder = builder.bcc(mailbox(address)?);
    }
    if notification.priority == Priority::High {
        builder = builder.header(XPriority);
    }

    let html = SinglePart::html(notification.html());
    let message = if notification.attachments.is_empty() {
        builder.singlepart(html)
    } else {
        let mut parts = MultiPart::mixed().singlepart(html);
        for path in &notification.attachments {
            parts = parts.singlepart(attachment_part(path).await?);
        }
        builder.multipart(parts)
    };

    Ok(message.map_err(|e| MailError::BuildFailed(e.to_string()))?)
}
