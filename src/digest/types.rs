//! Digest run outcomes.

use serde::Serialize;

/// Result of one user's digest delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Nothing to send. No channel was called and no state changed.
    Skipped,
    /// The digest was dispatched and `last_digest_sent` updated.
    Sent {
        /// Number of articles in the digest.
        articles: usize,
        /// Channels that accepted the digest.
        delivered: Vec<String>,
        /// Channels that failed.
        failed: Vec<String>,
    },
}

/// Counters for one scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Active users examined.
    pub checked: usize,
    /// Users due at this tick.
    pub due: usize,
    /// Digests dispatched.
    pub sent: usize,
    /// Due users with nothing to send.
    pub skipped: usize,
    /// Users whose eligibility check or delivery failed.
    pub failed: usize,
    /// Deliveries abandoned at the time bound.
    pub timed_out: usize,
}
