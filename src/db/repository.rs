//! User repository for Daily Digest.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DbPool, NewUser, User};
use crate::datetime::{parse_db_datetime, to_db_string};
use crate::feed::FeedSource;
use crate::{DigestError, Result};

/// Row type for a user from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    slack_webhook_url: String,
    timezone: String,
    schedule_hour: i64,
    is_active: bool,
    created_at: String,
    last_digest_sent: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            slack_webhook_url: row.slack_webhook_url,
            timezone: row.timezone,
            schedule_hour: row.schedule_hour.clamp(0, 23) as u32,
            is_active: row.is_active,
            created_at: parse_db_datetime(&row.created_at).unwrap_or_else(Utc::now),
            last_digest_sent: row.last_digest_sent.and_then(|s| parse_db_datetime(&s)),
        }
    }
}

const USER_COLUMNS: &str = "id, email, slack_webhook_url, timezone, schedule_hour, is_active, \
                            created_at, last_digest_sent";

/// Whether a sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a user together with its initial feeds.
    ///
    /// Runs in one transaction: either the user and all feeds are stored or
    /// nothing is. Feeds are inserted in the given order; a feed URL that
    /// appears twice is stored once.
    pub async fn create_with_feeds(&self, new_user: &NewUser, feeds: &[FeedSource]) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = to_db_string(&Utc::now());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, slack_webhook_url, timezone, schedule_hour, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&new_user.email)
        .bind(&new_user.slack_webhook_url)
        .bind(&new_user.timezone)
        .bind(new_user.schedule_hour as i64)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DigestError::DuplicateEmail(new_user.email.clone())
            } else {
                DigestError::Database(e.to_string())
            }
        })?;

        for feed in feeds {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO user_feeds (user_id, url, name, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&id)
            .bind(&feed.url)
            .bind(&feed.name)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DigestError::NotFound("user".into()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// List all active users (ordered by registration).
    pub async fn list_active(&self) -> Result<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active = 1 ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Count active users.
    pub async fn count_active(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active = 1")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Record when a digest was dispatched.
    pub async fn set_last_digest_sent(&self, id: &str, at: &DateTime<Utc>) -> Result<()> {
        let result = sqlx::query("UPDATE users SET last_digest_sent = $1 WHERE id = $2")
            .bind(to_db_string(at))
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DigestError::NotFound("user".into()));
        }
        Ok(())
    }

    /// Soft-delete a user.
    pub async fn deactivate(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_active = 0 WHERE id = $1 AND is_active = 1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
