use chrono::{DateTime, Utc};
use rand::Rng;

use super::RefreshStrategy;
use crate::model::Refreshable;
use crate::time;

const LOWER_BOUND: f64 = 0.01;
const UPPER_BOUND: f64 = 0.99;

/// Refreshes at a uniformly random point while the lifetime is between
/// `min` and `max` elapsed (both fractions of the lifetime).
///
/// Spreads refreshes of many refreshers holding same-lifetime values so
/// they don't all hit the source at once. With `min = 0.50` and `max = 0.75`
/// the refresh lands somewhere in the 50%-75% elapsed window.
#[derive(Debug, Clone, Copy)]
pub struct RandomWithinWindow {
    min: f64,
    max: f64,
}

impl RandomWithinWindow {
    /// Both bounds are clamped to `[0.01, 0.99]`; `min` is lowered to `max` if it exceeds it.
    pub fn new(min: f64, max: f64) -> Self {
        let max = clamp(max);
        let min = clamp(min).min(max);
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn refresh_at_from<T>(&self, refreshable: &Refreshable<T>, now: DateTime<Utc>) -> DateTime<Utc> {
        if refreshable.is_expired_at(now) || refreshable.is_degenerate() {
            return now;
        }

        let factor = self.min + rand::thread_rng().gen::<f64>() * (self.max - self.min);
        let due = refreshable.at_fraction(factor);
        if now > due {
            return now;
        }
        due
    }
}

fn clamp(v: f64) -> f64 {
    // NaN goes to the lower bound
    if v.is_nan() {
        return LOWER_BOUND;
    }
    v.clamp(LOWER_BOUND, UPPER_BOUND)
}

impl<T> RefreshStrategy<T> for RandomWithinWindow {
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc> {
        self.refresh_at_from(refreshable, time::now())
    }
}
