//! Notification channels.
//!
//! A digest is handed to every configured [`Channel`] independently; one
//! channel failing never stops the others.

mod email;
mod slack;

pub use email::EmailChannel;
pub use slack::SlackChannel;

use async_trait::async_trait;

use crate::db::User;
use crate::Result;

/// A rendered digest ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Subject line for channels that have one.
    pub subject: String,
    /// Full message text.
    pub text: String,
}

/// A delivery channel.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name used in logs and delivery outcomes.
    fn name(&self) -> &str;

    /// Deliver the notification to the user.
    async fn send(&self, user: &User, notification: &Notification) -> Result<()>;
}
