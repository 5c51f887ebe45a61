//! Digest scheduling and delivery.
//!
//! This module provides the hourly scheduler, the manual trigger path and
//! the per-user delivery coordinator.

pub mod delivery;
pub mod scheduler;
pub mod types;

pub use delivery::DeliveryCoordinator;
pub use scheduler::{already_sent_today, duration_until_next_hour, is_due, DigestScheduler};
pub use types::{DeliveryOutcome, TickReport};

use std::sync::Arc;

use crate::context::AppContext;

/// Start the digest scheduler as a background task.
pub fn start_scheduler(ctx: Arc<AppContext>) -> tokio::task::JoinHandle<()> {
    let scheduler = DigestScheduler::new(ctx);
    tokio::spawn(async move {
        scheduler.run().await;
    })
}
