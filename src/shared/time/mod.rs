//! Wall-clock helpers shared by strategies and the refresh loop.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Returns the current wall-clock time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Returns how long to wait from now until `at`, or zero if `at` is already past.
pub fn until(at: DateTime<Utc>) -> Duration {
    until_from(at, now())
}

/// Same as [`until`] but against an explicit `now`.
pub fn until_from(at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    at.signed_duration_since(now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Sentinel instant meaning "effectively never".
pub fn never() -> DateTime<Utc> {
    DateTime::<Utc>::MAX_UTC
}

/// Adds a std duration to a timestamp, saturating at [`never`].
pub fn add(at: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(d)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
        .unwrap_or_else(never)
}

/// Subtracts a std duration from a timestamp, saturating at the minimum instant.
pub fn sub(at: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(d)
        .ok()
        .and_then(|d| at.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_until_past_is_zero() {
        let now = now();
        let past = now - chrono::Duration::seconds(10);
        assert_eq!(until_from(past, now), Duration::ZERO);
    }

    #[test]
    fn test_until_future() {
        let now = now();
        let future = now + chrono::Duration::milliseconds(1500);
        assert_eq!(until_from(future, now), Duration::from_millis(1500));
    }

    #[test]
    fn test_add_saturates() {
        assert_eq!(add(never(), Duration::from_secs(1)), never());
        assert_eq!(add(now(), Duration::MAX), never());
    }

    #[test]
    fn test_sub_saturates() {
        assert_eq!(sub(DateTime::<Utc>::MIN_UTC, Duration::from_secs(1)), DateTime::<Utc>::MIN_UTC);
    }
}
