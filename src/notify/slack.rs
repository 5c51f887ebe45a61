//! Slack incoming-webhook channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{Channel, Notification};
use crate::config::SlackConfig;
use crate::db::User;
use crate::{DigestError, Result};

/// Webhook request timeout in seconds.
const WEBHOOK_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
    unfurl_links: bool,
    unfurl_media: bool,
}

/// Posts digests to each user's Slack webhook.
pub struct SlackChannel {
    client: Client,
    unfurl_links: bool,
    unfurl_media: bool,
}

impl SlackChannel {
    /// Create a Slack channel.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| DigestError::Delivery(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            unfurl_links: config.unfurl_links,
            unfurl_media: config.unfurl_media,
        })
    }

    fn payload<'a>(&self, text: &'a str) -> WebhookPayload<'a> {
        WebhookPayload {
            text,
            unfurl_links: self.unfurl_links,
            unfurl_media: self.unfurl_media,
        }
    }
}

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, user: &User, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&user.slack_webhook_url)
            .json(&self.payload(&notification.text))
            .send()
            .await
            .map_err(|e| DigestError::Delivery(format!("webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigestError::Delivery(format!(
                "webhook returned {}: {}",
                status,
                body.trim()
            )));
        }

        Ok(())
    }
}
