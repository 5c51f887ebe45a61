//! Daily Digest - per-user RSS digests
//!
//! Collects each subscriber's feeds once a day at their local delivery hour,
//! picks a varied set of articles, summarizes them and delivers the result
//! to Slack and, optionally, email.

pub mod account;
pub mod config;
pub mod context;
pub mod datetime;
pub mod db;
pub mod digest;
pub mod error;
pub mod feed;
pub mod logging;
pub mod notify;
pub mod oracle;
pub mod selector;
pub mod summary;
pub mod web;

pub use account::{AccountService, AddFeedRequest, RegisterRequest};
pub use config::Config;
pub use context::AppContext;
pub use db::{Database, NewUser, User, UserStore};
pub use digest::{DeliveryOutcome, DigestScheduler, TickReport};
pub use error::{DigestError, Result};
pub use web::WebServer;
