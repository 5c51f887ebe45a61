//! Feed and article types for Daily Digest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length for an entry summary after HTML stripping.
pub const MAX_SUMMARY_LENGTH: usize = 2000;

/// A stored feed subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    /// Feed ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: String,
    /// Feed URL (unique per user).
    pub url: String,
    /// Display name.
    pub name: String,
    /// Whether the feed is included in digests.
    pub is_active: bool,
    /// When the feed was added.
    pub created_at: DateTime<Utc>,
}

/// A feed descriptor handed to the aggregator: URL plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Feed URL.
    pub url: String,
    /// Display name.
    pub name: String,
}

impl FeedSource {
    /// Create a new feed source.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

impl From<&Feed> for FeedSource {
    fn from(feed: &Feed) -> Self {
        Self::new(&feed.url, &feed.name)
    }
}

/// A feed as returned by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Title the feed declares for itself.
    pub title: Option<String>,
    /// Entries in document order (newest first for most feeds).
    pub entries: Vec<ParsedEntry>,
}

/// A raw feed entry before normalization.
#[derive(Debug, Clone, Default)]
pub struct ParsedEntry {
    /// Entry title.
    pub title: Option<String>,
    /// Entry link.
    pub link: Option<String>,
    /// Summary with HTML stripped.
    pub summary: Option<String>,
    /// Publication (or last update) time.
    pub published: Option<DateTime<Utc>>,
}

/// A normalized candidate article.
///
/// Built fresh every fetch cycle and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Article title.
    pub title: String,
    /// Canonical link, the identity key within one cycle.
    pub link: String,
    /// Summary, empty when the feed has none.
    pub summary: String,
    /// Publication time, passed through as provided.
    pub published: Option<DateTime<Utc>>,
    /// Label of the feed the article came from.
    pub source: String,
}

impl Article {
    /// Strip the article down to the digest payload.
    pub fn to_digest(&self) -> DigestArticle {
        DigestArticle {
            title: self.title.clone(),
            link: self.link.clone(),
        }
    }
}

/// An article as it appears in a digest: title and link only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestArticle {
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
}
