//! Shared fakes for integration tests.
//!
//! Provides a static feed fetcher, a scripted oracle, a recording channel
//! and helpers that wire them into an `AppContext` over an in-memory
//! database. Nothing here touches the network.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dailydigest::config::Config;
use dailydigest::feed::{FeedFetcher, ParsedEntry, ParsedFeed};
use dailydigest::notify::{Channel, Notification};
use dailydigest::oracle::Oracle;
use dailydigest::{AppContext, Database, DigestError, Result, User};

/// A webhook accepted by the default Slack prefix.
pub const WEBHOOK: &str = "https://hooks.slack.com/services/T000/B000/XXXX";

/// Parse an RFC 3339 timestamp.
pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid timestamp")
}

/// Build a feed with `count` entries whose links are unique to `url`.
pub fn sample_feed(url: &str, title: &str, count: usize) -> ParsedFeed {
    ParsedFeed {
        title: Some(title.to_string()),
        entries: (1..=count)
            .map(|i| ParsedEntry {
                title: Some(format!("{} story {}", title, i)),
                link: Some(format!("{}/story-{}", url.trim_end_matches('/'), i)),
                summary: Some(format!("Summary of {} story {}", title, i)),
                published: None,
            })
            .collect(),
    }
}

/// Fetcher serving canned feeds.
///
/// Unknown URLs fail, unless `generate_unknown` is set, in which case a
/// feed is synthesized for them. URLs registered with `with_delay` sleep
/// before answering.
#[derive(Default)]
pub struct StaticFetcher {
    feeds: HashMap<String, ParsedFeed>,
    delays: HashMap<String, Duration>,
    generate_unknown: Option<usize>,
}

impl StaticFetcher {
    /// A fetcher that fails for every URL.
    pub fn failing() -> Self {
        Self::default()
    }

    /// A fetcher that serves `count` entries for any URL.
    pub fn generating(count: usize) -> Self {
        Self {
            generate_unknown: Some(count),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering for `url`.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Serve `feed` at `url`.
    pub fn with_feed(mut self, url: &str, feed: ParsedFeed) -> Self {
        self.feeds.insert(url.to_string(), feed);
        self
    }
}

#[async_trait]
impl FeedFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(feed) = self.feeds.get(url) {
            return Ok(feed.clone());
        }
        match self.generate_unknown {
            Some(count) => Ok(sample_feed(url, url, count)),
            None => Err(DigestError::Feed(format!("no such feed: {}", url))),
        }
    }
}

/// Oracle that replays scripted replies in order.
///
/// Once the script runs out every call fails.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    /// Create an oracle with the given replies.
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DigestError::Oracle("script exhausted".to_string())))
    }
}

/// Channel that records every notification it receives.
pub struct RecordingChannel {
    name: String,
    fail: bool,
    sent: Mutex<Vec<(String, Notification)>>,
}

impl RecordingChannel {
    /// A channel that accepts everything.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A channel that records and then fails every send.
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    /// (user id, notification) pairs in send order.
    pub fn sent(&self) -> Vec<(String, Notification)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, user: &User, notification: &Notification) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((user.id.clone(), notification.clone()));
        if self.fail {
            Err(DigestError::Delivery(format!("{} is down", self.name)))
        } else {
            Ok(())
        }
    }
}

/// Test configuration: small digests and two default feeds.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.digest.target_size = 3;
    config.feeds.defaults.truncate(2);
    config.scheduler.delivery_timeout_secs = 5;
    config
}

/// Build a context over a fresh in-memory database.
pub async fn build_context(
    config: Config,
    fetcher: StaticFetcher,
    oracle: Option<Arc<ScriptedOracle>>,
    channels: Vec<Arc<RecordingChannel>>,
) -> Arc<AppContext> {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let mut ctx = AppContext::new(config, Arc::new(db), Arc::new(fetcher));
    if let Some(oracle) = oracle {
        ctx = ctx.with_oracle(oracle);
    }
    for channel in channels {
        ctx = ctx.with_channel(channel);
    }
    Arc::new(ctx)
}
