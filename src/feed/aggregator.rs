//! Candidate article aggregation.
//!
//! Fetches every feed of a user concurrently and flattens the results into
//! one candidate pool. A feed that fails to fetch simply contributes nothing.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::fetcher::{url_host, FeedFetcher};
use super::types::{Article, FeedSource, ParsedFeed};

/// Feed aggregator.
pub struct Aggregator {
    fetcher: Arc<dyn FeedFetcher>,
    max_entries_per_feed: usize,
}

impl Aggregator {
    /// Create an aggregator that takes at most `max_entries_per_feed`
    /// entries from the head of each feed.
    pub fn new(fetcher: Arc<dyn FeedFetcher>, max_entries_per_feed: usize) -> Self {
        Self {
            fetcher,
            max_entries_per_feed,
        }
    }

    /// Fetch all sources and build the candidate pool.
    ///
    /// Output follows source order, then entry order within a feed. Entries
    /// without a title or link are skipped, and a link already seen earlier
    /// in the pool is dropped.
    pub async fn collect(&self, sources: &[FeedSource]) -> Vec<Article> {
        let fetches = sources.iter().map(|source| self.fetcher.fetch(&source.url));
        let results = join_all(fetches).await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut articles = Vec::new();

        for (position, (source, result)) in sources.iter().zip(results).enumerate() {
            let feed = match result {
                Ok(feed) => feed,
                Err(e) => {
                    warn!(feed = %source.url, error = %e, "Feed fetch failed, skipping");
                    continue;
                }
            };

            let label = source_label(&feed, source, position);
            let before = articles.len();
            self.normalize(feed, &label, &mut seen, &mut articles);
            debug!(
                feed = %source.url,
                source = %label,
                taken = articles.len() - before,
                "Feed aggregated"
            );
        }

        articles
    }

    fn normalize(
        &self,
        feed: ParsedFeed,
        label: &str,
        seen: &mut HashSet<String>,
        out: &mut Vec<Article>,
    ) {
        for entry in feed.entries.into_iter().take(self.max_entries_per_feed) {
            let (Some(title), Some(link)) = (entry.title, entry.link) else {
                continue;
            };
            if !seen.insert(link.clone()) {
                continue;
            }

            out.push(Article {
                title,
                link,
                summary: entry.summary.unwrap_or_default(),
                published: entry.published,
                source: label.to_string(),
            });
        }
    }
}

/// Choose the label shown for a feed's articles.
///
/// Precedence: the feed's own title, the configured name unless it merely
/// repeats the URL, the URL host, then a positional label.
pub fn source_label(feed: &ParsedFeed, source: &FeedSource, position: usize) -> String {
    if let Some(title) = &feed.title {
        return title.clone();
    }

    let name = source.name.trim();
    if !name.is_empty() && name != source.url {
        return name.to_string();
    }

    url_host(&source.url).unwrap_or_else(|| format!("Source {}", position + 1))
}
