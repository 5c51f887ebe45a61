//! Response DTOs for the HTTP surface.

use serde::Serialize;

use crate::db::User;
use crate::digest::DeliveryOutcome;
use crate::feed::Feed;

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain status message.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Status label.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

impl StatusResponse {
    /// Create a status response.
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Account
// ============================================================================

/// Successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user ID.
    pub user_id: String,
    /// URL that triggers an immediate digest for this user.
    pub trigger_url: String,
    /// URL of the subscription overview.
    pub manage_url: String,
}

/// User information in responses.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Contact email.
    pub email: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Local delivery hour.
    pub schedule_hour: u32,
    /// Whether the user receives digests.
    pub is_active: bool,
    /// Registration time (RFC 3339).
    pub created_at: String,
    /// Last delivery time (RFC 3339).
    pub last_digest_sent: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            timezone: user.timezone,
            schedule_hour: user.schedule_hour,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
            last_digest_sent: user.last_digest_sent.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Feed information in responses.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// Feed ID.
    pub id: i64,
    /// Feed URL.
    pub url: String,
    /// Display name.
    pub name: String,
    /// Whether the feed is aggregated.
    pub is_active: bool,
    /// Subscription time (RFC 3339).
    pub created_at: String,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            url: feed.url,
            name: feed.name,
            is_active: feed.is_active,
            created_at: feed.created_at.to_rfc3339(),
        }
    }
}

/// Subscription overview.
#[derive(Debug, Serialize)]
pub struct ManageResponse {
    /// The user.
    pub user: UserResponse,
    /// All feeds, including disabled ones.
    pub feeds: Vec<FeedResponse>,
}

// ============================================================================
// Digest
// ============================================================================

/// Platform statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Number of active users.
    pub total_active_users: i64,
    /// Service label.
    pub message: String,
}

/// Result of a manual single-user trigger.
#[derive(Debug, Serialize)]
pub struct TriggerUserResponse {
    /// User ID.
    pub user_id: String,
    /// Delivery outcome.
    pub outcome: DeliveryOutcome,
}
