use chrono::{DateTime, Utc};

use super::RefreshStrategy;
use crate::model::Refreshable;
use crate::time;

/// Default policy: refresh once two thirds of the lifetime has elapsed.
///
/// - already expired (or empty lifetime): now
/// - more than two thirds elapsed: now
/// - otherwise: `issued_at + 2/3 * (expires_at - issued_at)`
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoThirdsLifetime;

impl TwoThirdsLifetime {
    pub fn refresh_at_from<T>(&self, refreshable: &Refreshable<T>, now: DateTime<Utc>) -> DateTime<Utc> {
        if refreshable.is_expired_at(now) || refreshable.is_degenerate() {
            return now;
        }

        let due = refreshable.at_ratio(2, 3);
        if now > due {
            return now;
        }
        due
    }
}

impl<T> RefreshStrategy<T> for TwoThirdsLifetime {
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc> {
        self.refresh_at_from(refreshable, time::now())
    }
}
