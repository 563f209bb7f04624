//! Refreshable value snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::time;

/// One generation of a managed value together with its issuance and expiry instants.
///
/// A `Refreshable` is never mutated after creation: the refresher swaps a whole new
/// snapshot in on every successful refresh. `issued_at <= expires_at` is assumed but not
/// enforced; strategies treat an inverted pair as already expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refreshable<T> {
    pub value: T,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<T> Refreshable<T> {
    /// Creates a new snapshot.
    pub fn new(value: T, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value,
            issued_at,
            expires_at,
        }
    }

    /// Creates a snapshot issued now that expires after `ttl`.
    pub fn issued_now(value: T, ttl: Duration) -> Self {
        let issued_at = time::now();
        Self::new(value, issued_at, time::add(issued_at, ttl))
    }

    /// Total lifetime (`expires_at - issued_at`). Negative for inverted inputs.
    pub fn lifetime(&self) -> chrono::Duration {
        self.expires_at.signed_duration_since(self.issued_at)
    }

    /// Whether the lifetime is empty or inverted.
    pub fn is_degenerate(&self) -> bool {
        self.lifetime() <= chrono::Duration::zero()
    }

    /// Checks that `now` is past `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks expiry against the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(time::now())
    }

    /// Instant at which `numerator / denominator` of the lifetime has elapsed.
    pub fn at_ratio(&self, numerator: i64, denominator: i64) -> DateTime<Utc> {
        let offset = lifetime_nanos(self.lifetime()) * numerator as i128 / denominator.max(1) as i128;
        offset_from(self.issued_at, offset, self.expires_at)
    }

    /// Instant at which `fraction` (expected within `[0, 1]`) of the lifetime has elapsed.
    pub fn at_fraction(&self, fraction: f64) -> DateTime<Utc> {
        let offset = (lifetime_nanos(self.lifetime()) as f64 * fraction) as i128;
        offset_from(self.issued_at, offset, self.expires_at)
    }
}

fn lifetime_nanos(lifetime: chrono::Duration) -> i128 {
    match lifetime.num_nanoseconds() {
        Some(ns) => ns as i128,
        None => lifetime.num_milliseconds() as i128 * 1_000_000,
    }
}

fn offset_from(base: DateTime<Utc>, nanos: i128, fallback: DateTime<Utc>) -> DateTime<Utc> {
    let secs = (nanos / 1_000_000_000) as i64;
    let rem = (nanos % 1_000_000_000) as i64;
    chrono::Duration::try_seconds(secs)
        .and_then(|s| s.checked_add(&chrono::Duration::nanoseconds(rem)))
        .and_then(|d| base.checked_add_signed(d))
        .unwrap_or(fallback)
}
