//! Error types for Daily Digest.

use thiserror::Error;

/// Common error type for Daily Digest.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant unless the
    /// repository maps them to something more specific first.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A user with this email is already registered.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// The user already subscribes to this feed URL.
    #[error("feed already added: {0}")]
    DuplicateFeed(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Unknown or unparsable IANA timezone name.
    #[error("invalid timezone: {0}")]
    Timezone(String),

    /// Feed fetch or parse failure.
    #[error("feed error: {0}")]
    Feed(String),

    /// Selection or summarization oracle failure.
    #[error("oracle error: {0}")]
    Oracle(String),

    /// Notification transport failure.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Operation exceeded its time bound.
    #[error("timed out after {0} seconds")]
    Timeout(u64),
}

impl From<sqlx::Error> for DigestError {
    fn from(e: sqlx::Error) -> Self {
        DigestError::Database(e.to_string())
    }
}

/// Result type alias for Daily Digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
