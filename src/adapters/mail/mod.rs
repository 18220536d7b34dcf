//! Notification dispatch
//!
//! A [`Notification`] is transport-independent. [`SmtpDispatcher`] delivers it
//! through an SMTP relay, [`PickupDispatcher`] writes the formatted message to
//! a pickup folder (used for dry runs and relay-less hosts).

pub mod factory;
pub mod message;
pub mod pickup;
pub mod smtp;

pub use factory::create_dispatcher;
pub use message::{compose, Notification, Priority};
pub use pickup::PickupDispatcher;
pub use smtp::SmtpDispatcher;

use crate::domain::Result;
use async_trait::async_trait;

/// Delivers notifications
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Sends `notification` and stores a copy of its HTML body when a save
    /// path is set
    ///
    /// Once the message is delivered a failure to store the copy is logged,
    /// not returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RosterError::Mail`] when the notification has
    /// no recipients, an address or attachment is invalid, or delivery fails.
    async fn send(&self, notification: &Notification) -> Result<()>;
}
