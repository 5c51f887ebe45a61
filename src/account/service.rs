//! Account service.

use tracing::{debug, info};

use crate::config::Config;
use crate::datetime::parse_timezone;
use crate::db::{NewUser, User, UserStore};
use crate::feed::{validate_url, Feed, FeedFetcher};
use crate::{DigestError, Result};

/// Request to register a new subscriber.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Contact email.
    pub email: String,
    /// Slack incoming-webhook URL.
    pub slack_webhook_url: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Local delivery hour. Signed so out-of-range input can be reported.
    pub schedule_hour: i64,
}

impl RegisterRequest {
    /// Create a request with the UTC timezone and an 08:00 schedule.
    pub fn new(email: impl Into<String>, slack_webhook_url: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            slack_webhook_url: slack_webhook_url.into(),
            timezone: "UTC".to_string(),
            schedule_hour: 8,
        }
    }

    /// Set the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Set the schedule hour.
    pub fn with_schedule_hour(mut self, hour: i64) -> Self {
        self.schedule_hour = hour;
        self
    }
}

/// Request to add a feed to a user.
#[derive(Debug, Clone)]
pub struct AddFeedRequest {
    /// Owning user ID.
    pub user_id: String,
    /// Feed URL.
    pub url: String,
    /// Display name (optional, discovered from the feed if not provided).
    pub name: Option<String>,
}

impl AddFeedRequest {
    /// Create a new add feed request.
    pub fn new(user_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            url: url.into(),
            name: None,
        }
    }

    /// Set a custom display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A user together with all of their feeds.
#[derive(Debug, Clone)]
pub struct UserOverview {
    /// The user.
    pub user: User,
    /// Feeds, including inactive ones.
    pub feeds: Vec<Feed>,
}

/// Service for registration and feed management.
pub struct AccountService<'a> {
    store: &'a dyn UserStore,
    fetcher: &'a dyn FeedFetcher,
    config: &'a Config,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService.
    pub fn new(store: &'a dyn UserStore, fetcher: &'a dyn FeedFetcher, config: &'a Config) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    /// Register a subscriber with the default feed set.
    ///
    /// Input is validated before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is blank or malformed
    /// - The webhook does not start with the configured Slack prefix
    /// - The schedule hour is outside 0-23
    /// - The timezone is unknown
    /// - The email is already registered
    pub async fn register(&self, request: &RegisterRequest) -> Result<String> {
        let new_user = self.validate_registration(request)?;

        let user_id = self
            .store
            .add_user(&new_user, &self.config.feeds.defaults)
            .await?;

        info!(
            user_id = %user_id,
            timezone = %new_user.timezone,
            schedule_hour = new_user.schedule_hour,
            default_feeds = self.config.feeds.defaults.len(),
            defaults_version = %self.config.feeds.defaults_version,
            "User registered"
        );
        Ok(user_id)
    }

    fn validate_registration(&self, request: &RegisterRequest) -> Result<NewUser> {
        let email = request.email.trim();
        if email.is_empty() {
            return Err(DigestError::Validation("email is required".to_string()));
        }
        if !is_plausible_email(email) {
            return Err(DigestError::Validation(format!(
                "invalid email address: {}",
                email
            )));
        }

        let webhook = request.slack_webhook_url.trim();
        if !webhook.starts_with(&self.config.slack.webhook_prefix) {
            return Err(DigestError::Validation(format!(
                "Slack webhook URL must start with {}",
                self.config.slack.webhook_prefix
            )));
        }

        if !(0..=23).contains(&request.schedule_hour) {
            return Err(DigestError::Validation(
                "schedule hour must be between 0 and 23".to_string(),
            ));
        }

        let timezone = request.timezone.trim();
        parse_timezone(timezone).map_err(|e| DigestError::Validation(e.to_string()))?;

        Ok(NewUser::new(email, webhook)
            .with_timezone(timezone)
            .with_schedule_hour(request.schedule_hour as u32))
    }

    /// Look up a user, failing with `NotFound` when absent.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| DigestError::NotFound("user".to_string()))
    }

    /// A user and all of their feeds.
    pub async fn overview(&self, user_id: &str) -> Result<UserOverview> {
        let user = self.get_user(user_id).await?;
        let feeds = self.store.list_all_user_feeds(user_id).await?;
        Ok(UserOverview { user, feeds })
    }

    /// Subscribe a user to a feed.
    ///
    /// Without a name the feed's own title is used when it can be fetched,
    /// otherwise the URL.
    pub async fn add_feed(&self, request: &AddFeedRequest) -> Result<Feed> {
        self.get_user(&request.user_id).await?;

        let url = request.url.trim();
        validate_url(url)?;

        let name = match request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            Some(name) => name.to_string(),
            None => self.discover_title(url).await,
        };

        let feed = self.store.add_feed(&request.user_id, url, &name).await?;
        info!(user_id = %request.user_id, feed_id = feed.id, feed = %url, "Feed added");
        Ok(feed)
    }

    async fn discover_title(&self, url: &str) -> String {
        match self.fetcher.fetch(url).await {
            Ok(parsed) => parsed.title.unwrap_or_else(|| url.to_string()),
            Err(e) => {
                debug!(feed = %url, error = %e, "Could not discover feed title");
                url.to_string()
            }
        }
    }

    /// Remove one of a user's feeds.
    pub async fn remove_feed(&self, user_id: &str, feed_id: i64) -> Result<()> {
        self.store.remove_feed(user_id, feed_id).await?;
        info!(user_id = %user_id, feed_id, "Feed removed");
        Ok(())
    }

    /// Enable or disable one of a user's feeds.
    pub async fn set_feed_active(&self, user_id: &str, feed_id: i64, active: bool) -> Result<()> {
        self.store.set_feed_active(user_id, feed_id, active).await?;
        info!(user_id = %user_id, feed_id, active, "Feed toggled");
        Ok(())
    }

    /// Unsubscribe a user. The row is kept with the active flag cleared.
    pub async fn deactivate(&self, user_id: &str) -> Result<()> {
        self.store.deactivate_user(user_id).await?;
        info!(user_id = %user_id, "User deactivated");
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
