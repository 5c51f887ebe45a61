//! Request DTOs for the HTTP surface.

use serde::Deserialize;
use validator::Validate;

use super::validation::no_control_chars;

/// Registration form.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Contact email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Slack incoming-webhook URL.
    #[validate(url(message = "must be a URL"))]
    pub slack_webhook_url: String,
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    #[validate(length(min = 1, max = 64), custom(function = "no_control_chars"))]
    pub timezone: String,
    /// Local delivery hour.
    #[serde(default = "default_schedule_hour")]
    #[validate(range(min = 0, max = 23, message = "must be between 0 and 23"))]
    pub schedule_hour: i64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_schedule_hour() -> i64 {
    8
}

/// Feed subscription form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddFeedForm {
    /// Feed URL.
    #[validate(url(message = "must be a URL"))]
    pub url: String,
    /// Display name (optional).
    #[serde(default)]
    #[validate(length(max = 200), custom(function = "no_control_chars"))]
    pub name: Option<String>,
}

/// Feed enable/disable form.
#[derive(Debug, Deserialize, Validate)]
pub struct ToggleFeedForm {
    /// New active state.
    pub active: bool,
}
