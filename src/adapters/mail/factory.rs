//! Dispatcher factory

use super::{NotificationDispatcher, PickupDispatcher, SmtpDispatcher};
use crate::config::{MailTransport, RosterConfig};
use crate::domain::{MailError, Result};
use lettre::message::Mailbox;
use std::sync::Arc;

/// Create the dispatcher selected by `mail.transport`
///
/// A dry run always writes to the pickup folder, falling back to the log
/// folder when no pickup path is configured.
pub fn create_dispatcher(config: &RosterConfig, dry_run: bool) -> Result<Arc<dyn NotificationDispatcher>> {
    let mail = &config.mail;

    if mail.transport == MailTransport::Smtp && !dry_run {
        tracing::info!("Creating SMTP dispatcher");
        return Ok(Arc::new(SmtpDispatcher::new(mail)?));
    }

    let from = mail
        .from
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: mail.from.clone(),
            message: e.to_string(),
        })?;
    let folder = mail
        .pickup_path
        .clone()
        .unwrap_or_else(|| config.output.log_folder.clone());

    tracing::info!(folder = %folder, dry_run, "Creating pickup dispatcher");
    Ok(Arc::new(PickupDispatcher::new(folder, from)))
}
