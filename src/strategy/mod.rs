//! Refresh strategies: pure policies mapping a [`Refreshable`] to its next due instant.
//!
//! Every strategy is total. Degenerate or already-expired inputs fall back to "now".

pub mod random_window;
pub mod scheduled;
pub mod static_lifetime;
pub mod static_time;
pub mod two_thirds;


use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::model::Refreshable;

// Re-export main types
pub use random_window::RandomWithinWindow;
pub use scheduled::Scheduled;
pub use static_lifetime::{StaticLifetimeLeft, StaticLifetimeSpent};
pub use static_time::StaticTime;
pub use two_thirds::TwoThirdsLifetime;

/// RefreshStrategy decides when a value should be refreshed next.
pub trait RefreshStrategy<T>: Send + Sync {
    /// Returns the instant at which the refreshable should be refreshed.
    /// Must never fail; errors are handled internally by returning a valid instant.
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc>;
}

impl<T, S> RefreshStrategy<T> for Arc<S>
where
    S: RefreshStrategy<T> + ?Sized,
{
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc> {
        (**self).refresh_at(refreshable)
    }
}

/// Strategy backed by a plain function.
pub struct FnStrategy<F> {
    f: F,
}

impl<T, F> RefreshStrategy<T> for FnStrategy<F>
where
    F: Fn(&Refreshable<T>) -> DateTime<Utc> + Send + Sync,
{
    fn refresh_at(&self, refreshable: &Refreshable<T>) -> DateTime<Utc> {
        (self.f)(refreshable)
    }
}

/// Builds a strategy from a function.
pub fn from_fn<T, F>(f: F) -> FnStrategy<F>
where
    F: Fn(&Refreshable<T>) -> DateTime<Utc> + Send + Sync,
{
    FnStrategy { f }
}

/// Returns the default strategy (refresh at two thirds of the lifetime).
pub fn default_strategy<T>() -> Arc<dyn RefreshStrategy<T>> {
    Arc::new(TwoThirdsLifetime)
}
