//! Feed subscription repository for Daily Digest.

use chrono::Utc;

use super::types::Feed;
use crate::datetime::{parse_db_datetime, to_db_string};
use crate::db::{is_unique_violation, DbPool};
use crate::{DigestError, Result};

/// Row type for a feed subscription from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedRow {
    id: i64,
    user_id: String,
    url: String,
    name: String,
    is_active: bool,
    created_at: String,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: row.id,
            user_id: row.user_id,
            url: row.url,
            name: row.name,
            is_active: row.is_active,
            created_at: parse_db_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for per-user feed subscriptions.
pub struct FeedRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Add a feed for a user.
    ///
    /// Fails with `DuplicateFeed` when the user already has this URL.
    pub async fn create(&self, user_id: &str, url: &str, name: &str) -> Result<Feed> {
        let now = to_db_string(&Utc::now());
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO user_feeds (user_id, url, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(url)
        .bind(name)
        .bind(&now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DigestError::DuplicateFeed(url.to_string())
            } else {
                DigestError::Database(e.to_string())
            }
        })?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DigestError::NotFound("feed".into()))
    }

    /// Get a feed by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Feed>> {
        let row = sqlx::query_as::<_, FeedRow>(
            "SELECT id, user_id, url, name, is_active, created_at FROM user_feeds WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Feed::from))
    }

    /// List a user's active feeds in insertion order.
    pub async fn list_active_by_user(&self, user_id: &str) -> Result<Vec<Feed>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT id, user_id, url, name, is_active, created_at
            FROM user_feeds
            WHERE user_id = $1 AND is_active = 1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// List all of a user's feeds, including inactive ones.
    pub async fn list_all_by_user(&self, user_id: &str) -> Result<Vec<Feed>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT id, user_id, url, name, is_active, created_at
            FROM user_feeds
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// Enable or disable a feed owned by the user.
    ///
    /// Returns false when no feed with this ID belongs to the user.
    pub async fn set_active(&self, user_id: &str, feed_id: i64, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE user_feeds SET is_active = $1 WHERE id = $2 AND user_id = $3")
            .bind(active)
            .bind(feed_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a feed owned by the user.
    ///
    /// Returns false when no feed with this ID belongs to the user.
    pub async fn delete(&self, user_id: &str, feed_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_feeds WHERE id = $1 AND user_id = $2")
            .bind(feed_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
