//! User store interface.
//!
//! The digest pipeline, the account service and the web layer talk to
//! persistence through [`UserStore`]; [`Database`] is the SQLite-backed
//! implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Database, NewUser, User, UserRepository};
use crate::feed::{Feed, FeedRepository, FeedSource};
use crate::{DigestError, Result};

/// Persistence operations for users and their feed subscriptions.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users with the active flag set.
    async fn list_active_users(&self) -> Result<Vec<User>>;

    /// Look up a user by ID.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// A user's active feeds, in insertion order.
    async fn list_user_feeds(&self, user_id: &str) -> Result<Vec<Feed>>;

    /// All of a user's feeds, including inactive ones.
    async fn list_all_user_feeds(&self, user_id: &str) -> Result<Vec<Feed>>;

    /// Create a user with an initial feed set; returns the new user ID.
    ///
    /// Fails with `DuplicateEmail` when the email is taken, in which case
    /// neither the user nor any feed is stored.
    async fn add_user(&self, new_user: &NewUser, feeds: &[FeedSource]) -> Result<String>;

    /// Subscribe a user to a feed. Fails with `DuplicateFeed` on a repeated URL.
    async fn add_feed(&self, user_id: &str, url: &str, name: &str) -> Result<Feed>;

    /// Remove a user's feed. Fails with `NotFound` unless the user owns it.
    async fn remove_feed(&self, user_id: &str, feed_id: i64) -> Result<()>;

    /// Enable or disable a user's feed. Fails with `NotFound` unless the user owns it.
    async fn set_feed_active(&self, user_id: &str, feed_id: i64, active: bool) -> Result<()>;

    /// Record the time a digest was dispatched.
    async fn mark_digest_sent(&self, user_id: &str, at: DateTime<Utc>) -> Result<()>;

    /// Number of active users.
    async fn count_active_users(&self) -> Result<i64>;

    /// Soft-delete a user. Fails with `NotFound` for unknown or inactive users.
    async fn deactivate_user(&self, user_id: &str) -> Result<()>;
}

#[async_trait]
impl UserStore for Database {
    async fn list_active_users(&self) -> Result<Vec<User>> {
        UserRepository::new(self.pool()).list_active().await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        UserRepository::new(self.pool()).get_by_id(user_id).await
    }

    async fn list_user_feeds(&self, user_id: &str) -> Result<Vec<Feed>> {
        FeedRepository::new(self.pool())
            .list_active_by_user(user_id)
            .await
    }

    async fn list_all_user_feeds(&self, user_id: &str) -> Result<Vec<Feed>> {
        FeedRepository::new(self.pool())
            .list_all_by_user(user_id)
            .await
    }

    async fn add_user(&self, new_user: &NewUser, feeds: &[FeedSource]) -> Result<String> {
        let user = UserRepository::new(self.pool())
            .create_with_feeds(new_user, feeds)
            .await?;
        Ok(user.id)
    }

    async fn add_feed(&self, user_id: &str, url: &str, name: &str) -> Result<Feed> {
        FeedRepository::new(self.pool())
            .create(user_id, url, name)
            .await
    }

    async fn remove_feed(&self, user_id: &str, feed_id: i64) -> Result<()> {
        if FeedRepository::new(self.pool())
            .delete(user_id, feed_id)
            .await?
        {
            Ok(())
        } else {
            Err(DigestError::NotFound("feed".into()))
        }
    }

    async fn set_feed_active(&self, user_id: &str, feed_id: i64, active: bool) -> Result<()> {
        if FeedRepository::new(self.pool())
            .set_active(user_id, feed_id, active)
            .await?
        {
            Ok(())
        } else {
            Err(DigestError::NotFound("feed".into()))
        }
    }

    async fn mark_digest_sent(&self, user_id: &str, at: DateTime<Utc>) -> Result<()> {
        UserRepository::new(self.pool())
            .set_last_digest_sent(user_id, &at)
            .await
    }

    async fn count_active_users(&self) -> Result<i64> {
        UserRepository::new(self.pool()).count_active().await
    }

    async fn deactivate_user(&self, user_id: &str) -> Result<()> {
        if UserRepository::new(self.pool()).deactivate(user_id).await? {
            Ok(())
        } else {
            Err(DigestError::NotFound("user".into()))
        }
    }
}
