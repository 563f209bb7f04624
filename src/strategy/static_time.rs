use chrono::{DateTime, Utc};

use super::RefreshStrategy;
use crate::model::Refreshable;

/// Always refreshes at one fixed instant, ignoring the value's own timestamps.
#[derive(Debug, Clone, Copy)]
pub struct StaticTime {
    at: DateTime<Utc>,
}

impl StaticTime {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl<T> RefreshStrategy<T> for StaticTime {
    fn refresh_at(&self, _refreshable: &Refreshable<T>) -> DateTime<Utc> {
        self.at
    }
}
