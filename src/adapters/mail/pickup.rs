//! Pickup-folder dispatcher
//!
//! Writes each message as an RFC 5322 `.eml` file. An MTA pickup service can
//! deliver them; in dry runs they are simply left for inspection.

use super::message::{compose, Notification};
use super::NotificationDispatcher;
use crate::domain::{MailError, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes notifications to a folder instead of sending them
#[derive(Debug, Clone)]
pub struct PickupDispatcher {
    folder: PathBuf,
    from: Mailbox,
}

impl PickupDispatcher {
    pub fn new(folder: impl Into<PathBuf>, from: Mailbox) -> Self {
        Self {
            folder: folder.into(),
            from,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

#[async_trait]
impl NotificationDispatcher for PickupDispatcher {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = compose(&self.from, notification).await?;
        let path = self.folder.join(format!("{}.eml", Uuid::new_v4()));

        let write_error = |message: String| MailError::SaveFailed {
            path: path.display().to_string(),
            message,
        };
        tokio::fs::create_dir_all(&self.folder)
            .await
            .map_err(|e| write_error(e.to_string()))?;
        tokio::fs::write(&path, message.formatted())
            .await
            .map_err(|e| write_error(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            subject = %notification.subject,
            "Notification written to pickup folder"
        );

        notification.keep_copy().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RosterError;
    use tempfile::TempDir;

    fn dispatcher(folder: &Path) -> PickupDispatcher {
        PickupDispatcher::new(folder, "roster@contoso.net".parse().unwrap())
    }

    fn eml_files(folder: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(folder)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "eml"))
            .collect()
    }

    #[tokio::test]
    async fn test_send_writes_eml_and_copy() {
        let dir = TempDir::new().unwrap();
        let copy = dir.path().join("copy.html");
        let notification = Notification::new("1 new user created in the last 7 days")
            .with_to(&["hr@contoso.net".to_string()])
            .with_body_part("<p>body</p>")
            .with_save_path(&copy);

        dispatcher(dir.path()).send(&notification).await.unwrap();

        let files = eml_files(dir.path());
        assert_eq!(files.len(), 1);
        let raw = std::fs::read_to_string(&files[0]).unwrap();
        assert!(raw.contains("Subject: 1 new user created in the last 7 days"));
        assert_eq!(std::fs::read_to_string(copy).unwrap(), "<p>body</p>");
    }

    #[tokio::test]
    async fn test_unwritable_copy_does_not_fail_delivered_message() {
        let dir = TempDir::new().unwrap();
        let copy = dir.path().join("missing").join("Mail.html");
        let notification = Notification::new("1 new user created in the last 7 days")
            .with_to(&["hr@contoso.net".to_string()])
            .with_body_part("<p>body</p>")
            .with_save_path(&copy);

        dispatcher(dir.path()).send(&notification).await.unwrap();

        assert_eq!(eml_files(dir.path()).len(), 1);
        assert!(!copy.exists());
    }

    #[tokio::test]
    async fn test_send_without_recipients_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let err = dispatcher(dir.path())
            .send(&Notification::new("empty"))
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::Mail(MailError::NoRecipients)));
        assert!(eml_files(dir.path()).is_empty());
    }
}
