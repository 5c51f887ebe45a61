//! Feed module for Daily Digest.
//!
//! This module provides feed subscriptions, fetching, and aggregation of
//! candidate articles for a digest run.

pub mod aggregator;
pub mod fetcher;
pub mod repository;
pub mod types;

pub use aggregator::{source_label, Aggregator};
pub use fetcher::{strip_html, url_host, validate_url, FeedFetcher, HttpFeedFetcher};
pub use repository::FeedRepository;
pub use types::{
    Article, DigestArticle, Feed, FeedSource, ParsedEntry, ParsedFeed, MAX_SUMMARY_LENGTH,
};
