use chrono::{DateTime, Utc};

use super::RefreshStrategy;
use crate::model::Refreshable;
use crate::time;

/// Refreshes at the earliest configured instant that is still in the future.
///
/// Once every instant has passed the strategy returns [`time::never`], i.e. the
/// value is never refreshed again.
#[derive(Debug, Clone)]
pub struct Scheduled {
    times: Vec<DateTime<Utc>>,
}

impl Scheduled {
    pub fn new(times: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let mut times: Vec<_> = times.into_iter().collect();
        times.sort_unstable();
        Self { times }
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn refresh_at_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let idx = self.times.partition_point(|t| *t <= now);
        self.times.get(idx).copied().unwrap_or_else(time::never)
    }
}

impl<T> RefreshStrategy<T> for Scheduled {
    fn refresh_at(&self, _refreshable: &Refreshable<T>) -> DateTime<Utc> {
        self.refresh_at_from(time::now())
    }
}
