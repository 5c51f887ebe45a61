//! API handlers for the HTTP surface.

pub mod account;
pub mod digest;

pub use account::*;
pub use digest::*;

use std::sync::Arc;

use axum::http::{header, HeaderMap};

use crate::account::AccountService;
use crate::context::AppContext;
use crate::digest::DigestScheduler;

/// Application state shared across handlers.
pub struct AppState {
    /// Application context.
    pub ctx: Arc<AppContext>,
    /// Scheduler used by the manual trigger routes.
    pub scheduler: DigestScheduler,
}

impl AppState {
    /// Create a new application state.
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let scheduler = DigestScheduler::new(Arc::clone(&ctx));
        Self { ctx, scheduler }
    }

    /// Account service bound to this state.
    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(
            self.ctx.store.as_ref(),
            self.ctx.fetcher.as_ref(),
            &self.ctx.config,
        )
    }

    /// Base URL for links handed back to clients, always ending in `/`.
    ///
    /// Uses `server.public_url` when configured, then the request's Host
    /// header, then the bind address. A Host header that is not a plain
    /// `host[:port]` authority is ignored.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        let server = &self.ctx.config.server;
        let base = match server.public_base() {
            Some(url) => url.to_string(),
            None => match headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .filter(|host| is_plain_authority(host))
            {
                Some(host) => format!("http://{}", host),
                None => format!("http://{}:{}", server.host, server.port),
            },
        };

        if base.ends_with('/') {
            base
        } else {
            format!("{}/", base)
        }
    }
}

fn is_plain_authority(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
}
