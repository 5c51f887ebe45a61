//! User types.

use chrono::{DateTime, Utc};

/// A digest subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Opaque unique ID (UUID v4).
    pub id: String,
    /// Contact email, unique across users.
    pub email: String,
    /// Slack incoming-webhook URL.
    pub slack_webhook_url: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Preferred local hour of delivery (0-23).
    pub schedule_hour: u32,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the last digest was dispatched (UTC).
    pub last_digest_sent: Option<DateTime<Utc>>,
}

/// New user for registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Contact email.
    pub email: String,
    /// Slack incoming-webhook URL.
    pub slack_webhook_url: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Preferred local hour of delivery (0-23).
    pub schedule_hour: u32,
}

impl NewUser {
    /// Create a new user with the UTC timezone and an 08:00 schedule.
    pub fn new(email: impl Into<String>, slack_webhook_url: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            slack_webhook_url: slack_webhook_url.into(),
            timezone: "UTC".to_string(),
            schedule_hour: 8,
        }
    }

    /// Set the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Set the schedule hour.
    pub fn with_schedule_hour(mut self, hour: u32) -> Self {
        self.schedule_hour = hour;
        self
    }
}
