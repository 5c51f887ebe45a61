//! Digest scheduler.
//!
//! Wakes at the top of every hour, works out which users are due in their
//! own timezone, and delivers to each of them under a time bound.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info};

use super::delivery::DeliveryCoordinator;
use super::types::{DeliveryOutcome, TickReport};
use crate::context::AppContext;
use crate::datetime::{local_date, parse_timezone, to_local};
use crate::db::User;
use crate::{DigestError, Result};

/// Hourly digest scheduler.
pub struct DigestScheduler {
    ctx: Arc<AppContext>,
    delivery_timeout: Duration,
}

impl DigestScheduler {
    /// Create a scheduler over the application context.
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let delivery_timeout = Duration::from_secs(ctx.config.scheduler.delivery_timeout_secs);
        Self {
            ctx,
            delivery_timeout,
        }
    }

    /// Run the scheduler loop.
    ///
    /// This method runs indefinitely, ticking at the top of every UTC hour.
    pub async fn run(&self) {
        info!(
            "Digest scheduler started (delivery timeout: {} seconds)",
            self.delivery_timeout.as_secs()
        );

        loop {
            let wait = duration_until_next_hour(Utc::now());
            debug!("Next digest check in {} seconds", wait.as_secs());
            sleep(wait).await;
            self.tick(Utc::now()).await;
        }
    }

    /// Run one scheduling pass at `now`.
    ///
    /// Each due user is handled on their own: a failure or timeout for one
    /// user is logged and counted, and the pass moves on.
    pub async fn tick(&self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();

        let users = match self.ctx.store.list_active_users().await {
            Ok(users) => users,
            Err(e) => {
                error!("Failed to list active users: {}", e);
                return report;
            }
        };

        for user in users {
            report.checked += 1;

            match is_due(&user, now) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    error!(user_id = %user.id, error = %e, "Eligibility check failed");
                    report.failed += 1;
                    continue;
                }
            }
            report.due += 1;

            match self.deliver_bounded(&user, now).await {
                Ok(DeliveryOutcome::Sent { .. }) => report.sent += 1,
                Ok(DeliveryOutcome::Skipped) => report.skipped += 1,
                Err(DigestError::Timeout(secs)) => {
                    error!(user_id = %user.id, "Digest delivery timed out after {} seconds", secs);
                    report.timed_out += 1;
                }
                Err(e) => {
                    error!(user_id = %user.id, error = %e, "Digest delivery failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            checked = report.checked,
            due = report.due,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            timed_out = report.timed_out,
            "Digest check complete"
        );
        report
    }

    /// Deliver to one user now, bypassing the eligibility check.
    pub async fn trigger_user(&self, user_id: &str) -> Result<DeliveryOutcome> {
        let user = self
            .ctx
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| DigestError::NotFound("user".to_string()))?;

        info!(user_id = %user.id, "Manual digest triggered");
        self.deliver_bounded(&user, Utc::now()).await
    }

    async fn deliver_bounded(&self, user: &User, now: DateTime<Utc>) -> Result<DeliveryOutcome> {
        let coordinator = DeliveryCoordinator::new(&self.ctx);
        timeout(self.delivery_timeout, coordinator.deliver(user, now))
            .await
            .map_err(|_| DigestError::Timeout(self.delivery_timeout.as_secs()))?
    }
}

/// Whether the user should receive a digest at `now`.
///
/// Due means the user's local hour equals their schedule hour and no digest
/// has been sent yet on the current local calendar date.
pub fn is_due(user: &User, now: DateTime<Utc>) -> Result<bool> {
    let tz = parse_timezone(&user.timezone)?;
    let local = to_local(&now, tz);

    Ok(local.hour() == user.schedule_hour && !already_sent_today(user, tz, local.date_naive()))
}

/// Whether the last digest fell on `today` in the user's timezone.
pub fn already_sent_today(user: &User, tz: Tz, today: NaiveDate) -> bool {
    user.last_digest_sent
        .map(|sent| local_date(&sent, tz) == today)
        .unwrap_or(false)
}

/// Time from `now` to the next top of the hour.
pub fn duration_until_next_hour(now: DateTime<Utc>) -> Duration {
    let into_hour = Duration::from_secs(u64::from(now.minute() * 60 + now.second()))
        + Duration::from_nanos(u64::from(now.nanosecond().min(999_999_999)));
    Duration::from_secs(3600).saturating_sub(into_hour)
}
