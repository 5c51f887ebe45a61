//! Delivery coordinator.
//!
//! Runs one user's digest end to end: gather candidates, select, summarize,
//! fan out to the channels and commit `last_digest_sent`.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::types::DeliveryOutcome;
use crate::context::AppContext;
use crate::datetime::{local_date, parse_timezone};
use crate::db::User;
use crate::feed::{Aggregator, FeedSource};
use crate::notify::Notification;
use crate::selector::select_articles;
use crate::summary::{email_subject, slack_message, Summarizer};
use crate::Result;

/// Coordinates a single digest run for one user.
pub struct DeliveryCoordinator<'a> {
    ctx: &'a AppContext,
}

impl<'a> DeliveryCoordinator<'a> {
    /// Create a coordinator over the application context.
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Feeds used for a user: their active feeds, or the defaults when
    /// they have none.
    pub async fn sources_for(&self, user: &User) -> Result<Vec<FeedSource>> {
        let feeds = self.ctx.store.list_user_feeds(&user.id).await?;
        if feeds.is_empty() {
            debug!(
                user_id = %user.id,
                defaults_version = %self.ctx.config.feeds.defaults_version,
                "User has no active feeds, using defaults"
            );
            return Ok(self.ctx.config.feeds.defaults.clone());
        }
        Ok(feeds.iter().map(FeedSource::from).collect())
    }

    /// Build and dispatch the user's digest.
    ///
    /// An empty selection is skipped without side effects. Otherwise every
    /// channel is attempted independently and `last_digest_sent` is set to
    /// `now` once all attempts have finished, whatever their outcome.
    pub async fn deliver(&self, user: &User, now: DateTime<Utc>) -> Result<DeliveryOutcome> {
        let tz = parse_timezone(&user.timezone)?;
        let config = &self.ctx.config;

        let sources = self.sources_for(user).await?;
        let candidates = Aggregator::new(self.ctx.fetcher.clone(), config.feeds.max_entries_per_feed)
            .collect(&sources)
            .await;

        let (selected, strategy) =
            select_articles(&candidates, &config.digest, self.ctx.oracle()).await;
        debug!(
            user_id = %user.id,
            feeds = sources.len(),
            candidates = candidates.len(),
            selected = selected.len(),
            ?strategy,
            "Articles selected"
        );

        if selected.is_empty() {
            info!(user_id = %user.id, "No articles to send, skipping digest");
            return Ok(DeliveryOutcome::Skipped);
        }

        let summary = Summarizer::new(self.ctx.oracle.clone(), config.digest.target_size)
            .summarize(&selected)
            .await;

        let notification = Notification {
            subject: email_subject(local_date(&now, tz)),
            text: slack_message(&user.email, &summary.text),
        };

        let attempts = self.ctx.channels.iter().map(|channel| {
            let notification = &notification;
            async move { (channel.name().to_string(), channel.send(user, notification).await) }
        });

        let mut delivered = Vec::new();
        let mut failed = Vec::new();
        for (name, result) in join_all(attempts).await {
            match result {
                Ok(()) => delivered.push(name),
                Err(e) => {
                    warn!(user_id = %user.id, channel = %name, error = %e, "Channel delivery failed");
                    failed.push(name);
                }
            }
        }

        self.ctx.store.mark_digest_sent(&user.id, now).await?;

        info!(
            user_id = %user.id,
            articles = selected.len(),
            oracle_summary = summary.from_oracle,
            delivered = ?delivered,
            failed = ?failed,
            "Digest dispatched"
        );

        Ok(DeliveryOutcome::Sent {
            articles: selected.len(),
            delivered,
            failed,
        })
    }
}
