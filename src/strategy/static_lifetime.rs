use chrono::{DateTime, Utc};
use std::time::Duration;

use super::RefreshStrategy;
use crate::model::Refreshable;
use crate::time;

/// Refreshes a fixed duration before `expires_at`.
#[derive(Debug, Clone, Copy)]
pub struct StaticLifetimeLeft {
    lifetime_left: Duration,
}

impl StaticLifetimeLeft {
    pub fn new(lifetime_left: Duration) -> Self {
        Self { lifetime_left }
    }

    pub fn refresh_at_from<T>(&self, refreshable: &Refreshable<T>, now: DateTime<Utc>) -> DateTime<Utc> {
        floor_now(time::sub(refreshable.expires_at, self.lifetime_left), now)
    }
}

impl<T> RefreshStrategy<T> for StaticLifetimeLeft {
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc> {
        self.refresh_at_from(refreshable, time::now())
    }
}

/// Refreshes a fixed duration after `issued_at`.
#[derive(Debug, Clone, Copy)]
pub struct StaticLifetimeSpent {
    lifetime_spent: Duration,
}

impl StaticLifetimeSpent {
    pub fn new(lifetime_spent: Duration) -> Self {
        Self { lifetime_spent }
    }

    pub fn refresh_at_from<T>(&self, refreshable: &Refreshable<T>, now: DateTime<Utc>) -> DateTime<Utc> {
        // An expired value is due now even if the spent mark lies past expiry.
        if refreshable.is_expired_at(now) {
            return now;
        }
        floor_now(time::add(refreshable.issued_at, self.lifetime_spent), now)
    }
}

impl<T> RefreshStrategy<T> for StaticLifetimeSpent {
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc> {
        self.refresh_at_from(refreshable, time::now())
    }
}

fn floor_now(at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now < at {
        at
    } else {
        now
    }
}
