//! Configuration module for Daily Digest.

use serde::Deserialize;
use std::path::Path;

use crate::feed::FeedSource;
use crate::{DigestError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used when building trigger links (e.g., "https://digest.example.com").
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

impl ServerConfig {
    /// Configured public base URL, if set and non-blank.
    pub fn public_base(&self) -> Option<&str> {
        self.public_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/digest.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/digest.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the hourly cadence driver runs.
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,
    /// Upper bound for one user's end-to-end delivery, in seconds.
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_secs: u64,
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_delivery_timeout() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scheduler_enabled(),
            delivery_timeout_secs: default_delivery_timeout(),
        }
    }
}

/// Digest curation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    /// Number of articles in one digest.
    #[serde(default = "default_target_size")]
    pub target_size: usize,
    /// Maximum number of candidates shown to the selection oracle.
    #[serde(default = "default_manifest_limit")]
    pub manifest_limit: usize,
    /// Characters of each candidate's summary shown to the selection oracle.
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
}

fn default_target_size() -> usize {
    12
}

fn default_manifest_limit() -> usize {
    40
}

fn default_summary_chars() -> usize {
    280
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            manifest_limit: default_manifest_limit(),
            summary_chars: default_summary_chars(),
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Maximum entries taken from the head of each feed.
    #[serde(default = "default_max_entries_per_feed")]
    pub max_entries_per_feed: usize,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// Version tag of the default feed list.
    #[serde(default = "default_defaults_version")]
    pub defaults_version: String,
    /// Feeds given to new users and used for users without any feeds.
    #[serde(default = "default_feeds")]
    pub defaults: Vec<FeedSource>,
}

fn default_max_entries_per_feed() -> usize {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_defaults_version() -> String {
    "2024-06".to_string()
}

fn default_feeds() -> Vec<FeedSource> {
    [
        ("https://blog.langchain.dev/rss/", "LangChain Blog"),
        ("https://openai.com/blog/rss.xml", "OpenAI Blog"),
        ("https://www.blog.pythonlibrary.org/feed/", "Python Library Blog"),
        ("https://huggingface.co/blog/feed.xml", "Hugging Face Blog"),
        ("https://feeds.feedburner.com/TheHackersNews", "The Hacker News"),
        ("https://javascriptweekly.com/rss", "JavaScript Weekly"),
        ("https://techcrunch.com/feed/", "TechCrunch"),
        ("https://feeds.arstechnica.com/arstechnica/index", "Ars Technica"),
        ("https://stackoverflow.blog/feed/", "Stack Overflow Blog"),
        ("https://news.mit.edu/topic/mitmachine-learning-rss.xml", "MIT ML News"),
    ]
    .into_iter()
    .map(|(url, name)| FeedSource::new(url, name))
    .collect()
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            max_entries_per_feed: default_max_entries_per_feed(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            defaults_version: default_defaults_version(),
            defaults: default_feeds(),
        }
    }
}

/// LLM oracle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Chat model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u64,
    /// API key. Empty disables the oracle.
    #[serde(default)]
    pub api_key: String,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_oracle_timeout() -> u64 {
    20
}

impl OracleConfig {
    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_oracle_timeout(),
            api_key: String::new(),
        }
    }
}

/// Slack configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Required prefix of user webhook URLs.
    #[serde(default = "default_webhook_prefix")]
    pub webhook_prefix: String,
    /// Let Slack unfurl article links.
    #[serde(default)]
    pub unfurl_links: bool,
    /// Let Slack unfurl media.
    #[serde(default)]
    pub unfurl_media: bool,
}

fn default_webhook_prefix() -> String {
    "https://hooks.slack.com/".to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_prefix: default_webhook_prefix(),
            unfurl_links: false,
            unfurl_media: false,
        }
    }
}

/// SMTP authentication mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailAuth {
    /// OAuth2 bearer token (`secret` is the access token).
    Xoauth2,
    /// Username/password (`secret` is the password).
    Plain,
}

/// Email configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether the email channel is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// SMTP username. Empty means `from`.
    #[serde(default)]
    pub username: String,
    /// Authentication mechanism.
    #[serde(default = "default_email_auth")]
    pub auth: EmailAuth,
    /// OAuth2 access token or password.
    #[serde(default)]
    pub secret: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_email_auth() -> EmailAuth {
    EmailAuth::Xoauth2
}

impl EmailConfig {
    /// SMTP login name.
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.from
        } else {
            &self.username
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            from: String::new(),
            username: String::new(),
            auth: default_email_auth(),
            secret: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Digest curation configuration.
    #[serde(default)]
    pub digest: DigestConfig,
    /// Feed fetching configuration.
    #[serde(default)]
    pub feeds: FeedsConfig,
    /// LLM oracle configuration.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Slack configuration.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Email configuration.
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DigestError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DigestError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables (empty values are ignored):
    /// - `DIGEST_OPENAI_API_KEY` / `OPENAI_API_KEY`: oracle API key
    /// - `DIGEST_EMAIL_SECRET`: SMTP access token or password
    /// - `DIGEST_EMAIL_FROM`: sender address
    /// - `DIGEST_DATABASE_PATH`: database file path
    /// - `PORT`: HTTP port
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = env_value("DIGEST_OPENAI_API_KEY").or_else(|| env_value("OPENAI_API_KEY"))
        {
            self.oracle.api_key = key;
        }
        if let Some(secret) = env_value("DIGEST_EMAIL_SECRET") {
            self.email.secret = secret;
        }
        if let Some(from) = env_value("DIGEST_EMAIL_FROM") {
            self.email.from = from;
        }
        if let Some(path) = env_value("DIGEST_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(port) = env_value("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.digest.target_size == 0 {
            return Err(DigestError::Config(
                "digest.target_size must be at least 1".to_string(),
            ));
        }
        if self.digest.manifest_limit < self.digest.target_size {
            return Err(DigestError::Config(format!(
                "digest.manifest_limit ({}) must not be smaller than digest.target_size ({})",
                self.digest.manifest_limit, self.digest.target_size
            )));
        }
        if self.scheduler.delivery_timeout_secs == 0 {
            return Err(DigestError::Config(
                "scheduler.delivery_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.feeds.max_entries_per_feed == 0 {
            return Err(DigestError::Config(
                "feeds.max_entries_per_feed must be at least 1".to_string(),
            ));
        }
        for feed in &self.feeds.defaults {
            url::Url::parse(&feed.url).map_err(|e| {
                DigestError::Config(format!("invalid default feed URL {}: {e}", feed.url))
            })?;
        }
        if self.email.enabled && (self.email.from.is_empty() || self.email.secret.is_empty()) {
            return Err(DigestError::Config(
                "email is enabled but email.from or email.secret is not set. \
                 Set them in config.toml or via DIGEST_EMAIL_FROM / DIGEST_EMAIL_SECRET."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8888);
        assert!(config.server.public_url.is_none());

        assert_eq!(config.database.path, "data/digest.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/digest.log");

        assert!(config.scheduler.enabled);
        assert_eq!(config.scheduler.delivery_timeout_secs, 30);

        assert_eq!(config.digest.target_size, 12);
        assert_eq!(config.digest.manifest_limit, 40);

        assert_eq!(config.feeds.max_entries_per_feed, 5);
        assert_eq!(config.feeds.defaults.len(), 10);
        assert_eq!(config.feeds.defaults[0].name, "LangChain Blog");

        assert!(!config.oracle.is_enabled());
        assert_eq!(config.oracle.model, "gpt-4");

        assert_eq!(config.slack.webhook_prefix, "https://hooks.slack.com/");
        assert!(!config.email.enabled);
        assert_eq!(config.email.auth, EmailAuth::Xoauth2);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
public_url = "https://digest.example.com"

[database]
path = "custom/digest.sqlite"

[logging]
level = "debug"
file = "custom/logs/app.log"

[scheduler]
enabled = false
delivery_timeout_secs = 45

[digest]
target_size = 6
manifest_limit = 20
summary_chars = 100

[feeds]
max_entries_per_feed = 3
defaults_version = "test-1"
defaults = [
    { url = "https://example.com/a.xml", name = "A" },
    { url = "https://example.com/b.xml", name = "B" },
]

[oracle]
model = "gpt-4o-mini"
temperature = 0.0
api_key = "sk-test"

[slack]
unfurl_links = true

[email]
enabled = true
from = "digest@example.com"
auth = "plain"
secret = "hunter2"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.public_url.as_deref(),
            Some("https://digest.example.com")
        );
        assert_eq!(config.database.path, "custom/digest.sqlite");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.scheduler.enabled);
        assert_eq!(config.scheduler.delivery_timeout_secs, 45);
        assert_eq!(config.digest.target_size, 6);
        assert_eq!(config.digest.manifest_limit, 20);
        assert_eq!(config.feeds.max_entries_per_feed, 3);
        assert_eq!(config.feeds.defaults_version, "test-1");
        assert_eq!(config.feeds.defaults.len(), 2);
        assert_eq!(config.feeds.defaults[1].url, "https://example.com/b.xml");
        assert!(config.oracle.is_enabled());
        assert_eq!(config.oracle.model, "gpt-4o-mini");
        assert!(config.slack.unfurl_links);
        assert!(!config.slack.unfurl_media);
        assert!(config.email.enabled);
        assert_eq!(config.email.auth, EmailAuth::Plain);
        assert_eq!(config.email.login(), "digest@example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.digest.target_size, 12);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server\nport = ");
        assert!(result.is_err());
        if let Err(DigestError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[digest]\ntarget_size = 7\n").unwrap();

        let config = Config::load_with_env(&path).unwrap();
        assert_eq!(config.digest.target_size, 7);
        assert!(matches!(
            Config::load_with_env(dir.path().join("missing.toml")),
            Err(DigestError::Io(_))
        ));
    }

    #[test]
    fn test_public_base() {
        let mut server = ServerConfig::default();
        assert_eq!(server.public_base(), None);

        server.public_url = Some("   ".to_string());
        assert_eq!(server.public_base(), None);

        server.public_url = Some(" https://digest.example.com ".to_string());
        assert_eq!(server.public_base(), Some("https://digest.example.com"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(DigestError::Io(_))));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_target() {
        let mut config = Config::default();
        config.digest.target_size = 0;
        assert!(matches!(config.validate(), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_validate_manifest_smaller_than_target() {
        let mut config = Config::default();
        config.digest.manifest_limit = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("manifest_limit"));
    }

    #[test]
    fn test_validate_email_without_secret() {
        let mut config = Config::default();
        config.email.enabled = true;
        config.email.from = "digest@example.com".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("email.secret"));
    }

    #[test]
    fn test_validate_bad_default_feed() {
        let mut config = Config::default();
        config.feeds.defaults.push(FeedSource::new("not a url", "Broken"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_email_login_prefers_username() {
        let mut email = EmailConfig::default();
        email.from = "from@example.com".to_string();
        assert_eq!(email.login(), "from@example.com");

        email.username = "smtp-user".to_string();
        assert_eq!(email.login(), "smtp-user");
    }

    #[test]
    fn test_apply_env_overrides_api_key() {
        let original = std::env::var("DIGEST_OPENAI_API_KEY").ok();

        std::env::set_var("DIGEST_OPENAI_API_KEY", "sk-from-env");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.oracle.api_key, "sk-from-env");

        std::env::set_var("DIGEST_OPENAI_API_KEY", "");
        let mut config = Config::default();
        config.oracle.api_key = "sk-original".to_string();
        config.apply_env_overrides();
        // OPENAI_API_KEY may still be set in the environment running the tests
        if std::env::var("OPENAI_API_KEY").map_or(true, |v| v.is_empty()) {
            assert_eq!(config.oracle.api_key, "sk-original");
        }

        if let Some(val) = original {
            std::env::set_var("DIGEST_OPENAI_API_KEY", val);
        } else {
            std::env::remove_var("DIGEST_OPENAI_API_KEY");
        }
    }
}
