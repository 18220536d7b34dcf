//! SMTP relay dispatcher

use super::message::{compose, Notification};
use super::NotificationDispatcher;
use crate::config::{MailConfig, MailSecurity};
use crate::domain::{MailError, Result, RosterError};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Sends notifications through an SMTP relay
pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    relay: String,
}

impl SmtpDispatcher {
    /// Builds the transport from `[mail]` settings
    ///
    /// No connection is opened until the first send.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| RosterError::Configuration("mail.smtp_host is required".to_string()))?;
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress {
                address: config.from.clone(),
                message: e.to_string(),
            })?;

        let builder = match config.security {
            MailSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
            MailSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::BuildFailed(e.to_string()))?,
            MailSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| MailError::BuildFailed(e.to_string()))?,
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            let password: &str = password.expose_secret().as_ref();
            builder = builder.credentials(Credentials::new(username.clone(), password.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            relay: format!("{host}:{}", config.smtp_port),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for SmtpDispatcher {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = compose(&self.from, notification).await?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        tracing::info!(
            relay = %self.relay,
            subject = %notification.subject,
            recipients = notification.to.len() + notification.bcc.len(),
            code = %response.code(),
            "Notification sent"
        );

        notification.keep_copy().await;
        Ok(())
    }
}
