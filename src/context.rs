//! Process-scoped application context.
//!
//! Built once at start-up and shared by the scheduler and the web layer.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::db::{Database, UserStore};
use crate::feed::{FeedFetcher, HttpFeedFetcher};
use crate::notify::{Channel, EmailChannel, SlackChannel};
use crate::oracle::{ChatOracle, Oracle};
use crate::Result;

/// Collaborators of the digest pipeline.
pub struct AppContext {
    /// Validated configuration.
    pub config: Config,
    /// User and feed persistence.
    pub store: Arc<dyn UserStore>,
    /// Feed source.
    pub fetcher: Arc<dyn FeedFetcher>,
    /// Language-model oracle, if configured.
    pub oracle: Option<Arc<dyn Oracle>>,
    /// Delivery channels, attempted in order.
    pub channels: Vec<Arc<dyn Channel>>,
}

impl AppContext {
    /// Create a context with no oracle and no channels.
    pub fn new(config: Config, store: Arc<dyn UserStore>, fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self {
            config,
            store,
            fetcher,
            oracle: None,
            channels: Vec::new(),
        }
    }

    /// Set the oracle.
    pub fn with_oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Add a delivery channel.
    pub fn with_channel(mut self, channel: Arc<dyn Channel>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Build the production context: HTTP fetcher, chat oracle when an API
    /// key is set, Slack, and email when enabled.
    pub fn from_config(config: Config, db: Database) -> Result<Self> {
        let fetcher = Arc::new(HttpFeedFetcher::new(&config.feeds)?);
        let slack = Arc::new(SlackChannel::new(&config.slack)?);
        let mut ctx = Self::new(config, Arc::new(db), fetcher).with_channel(slack);

        if ctx.config.oracle.is_enabled() {
            let oracle = ChatOracle::new(&ctx.config.oracle)?;
            info!(model = %ctx.config.oracle.model, "Oracle enabled");
            ctx = ctx.with_oracle(Arc::new(oracle));
        } else {
            info!("No oracle API key configured, using deterministic selection and formatting");
        }

        if ctx.config.email.enabled {
            let email = EmailChannel::new(&ctx.config.email)?;
            info!(smtp_host = %ctx.config.email.smtp_host, "Email channel enabled");
            ctx = ctx.with_channel(Arc::new(email));
        }

        Ok(ctx)
    }

    /// Oracle as a trait-object reference.
    pub fn oracle(&self) -> Option<&dyn Oracle> {
        self.oracle.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_defaults() {
        let db = Database::open_in_memory().await.unwrap();
        let ctx = AppContext::from_config(Config::default(), db).unwrap();

        assert!(ctx.oracle().is_none());
        let names: Vec<&str> = ctx.channels.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["slack"]);
    }

    #[tokio::test]
    async fn test_from_config_all_enabled() {
        let db = Database::open_in_memory().await.unwrap();
        let mut config = Config::default();
        config.oracle.api_key = "sk-test".to_string();
        config.email.enabled = true;
        config.email.from = "digest@example.com".to_string();
        config.email.secret = "token".to_string();

        let ctx = AppContext::from_config(config, db).unwrap();
        assert_eq!(ctx.oracle().map(|o| o.name()), Some("gpt-4"));
        let names: Vec<&str> = ctx.channels.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["slack", "email"]);
    }
}
