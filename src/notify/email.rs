//! SMTP email channel.

use std::str::FromStr;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{Channel, Notification};
use crate::config::{EmailAuth, EmailConfig};
use crate::db::User;
use crate::{DigestError, Result};

/// Sends digests as plain-text email over STARTTLS SMTP.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailChannel {
    /// Create an email channel from the email settings.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from = Mailbox::from_str(&config.from)
            .map_err(|e| DigestError::Config(format!("invalid email.from address: {}", e)))?;

        let mechanism = match config.auth {
            EmailAuth::Xoauth2 => Mechanism::Xoauth2,
            EmailAuth::Plain => Mechanism::Plain,
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| DigestError::Config(format!("invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.login().to_string(),
                config.secret.clone(),
            ))
            .authentication(vec![mechanism])
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, to: &str, notification: &Notification) -> Result<Message> {
        let to = Mailbox::from_str(to)
            .map_err(|e| DigestError::Delivery(format!("invalid recipient address: {}", e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&notification.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(notification.text.clone())
            .map_err(|e| DigestError::Delivery(format!("failed to build email: {}", e)))
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, user: &User, notification: &Notification) -> Result<()> {
        let message = self.build_message(&user.email, notification)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DigestError::Delivery(format!("SMTP send failed: {}", e)))?;

        debug!(user_id = %user.id, "Digest email sent");
        Ok(())
    }
}
