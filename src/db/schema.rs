//! Database schema and migrations for Daily Digest.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded; the schema_version table records which ones ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users (subscribers)
    r#"
CREATE TABLE users (
    id                  TEXT PRIMARY KEY,        -- UUID v4
    email               TEXT NOT NULL UNIQUE,
    slack_webhook_url   TEXT NOT NULL,
    timezone            TEXT NOT NULL DEFAULT 'UTC',
    schedule_hour       INTEGER NOT NULL DEFAULT 8 CHECK (schedule_hour BETWEEN 0 AND 23),
    is_active           INTEGER NOT NULL DEFAULT 1,
    created_at          TEXT NOT NULL DEFAULT (datetime('now')),
    last_digest_sent    TEXT                     -- UTC, NULL until the first digest
);

CREATE INDEX idx_users_is_active ON users(is_active);
"#,
    // v2: Per-user feed subscriptions
    r#"
CREATE TABLE user_feeds (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    url         TEXT NOT NULL,
    name        TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (user_id, url)
);

CREATE INDEX idx_user_feeds_user_id ON user_feeds(user_id);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert_eq!(MIGRATIONS.len(), 2);
    }

    #[test]
    fn test_users_migration_constraints() {
        let users = MIGRATIONS[0];
        assert!(users.contains("email               TEXT NOT NULL UNIQUE"));
        assert!(users.contains("CHECK (schedule_hour BETWEEN 0 AND 23)"));
    }

    #[test]
    fn test_feeds_migration_unique_pair() {
        assert!(MIGRATIONS[1].contains("UNIQUE (user_id, url)"));
    }
}
