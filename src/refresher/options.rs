// Package refresher provides construction-time options.

use std::sync::Arc;
use std::time::Duration;

use super::hooks::Hooks;
use crate::config::Schedule;
use crate::model::Refreshable;
use crate::storage::Storage;
use crate::strategy::{self, RefreshStrategy};

/// Default delay before retrying a failed refresh.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(15 * 60);

/// Default refresher name used in logs and metrics.
pub const DEFAULT_NAME: &str = "refresher";

/// Options represents refresher configuration.
pub struct Options<T> {
    pub(crate) name: String,
    pub(crate) retry_delay: Duration,
    pub(crate) strategy: Arc<dyn RefreshStrategy<T>>,
    pub(crate) storage: Option<Arc<dyn Storage<T>>>,
    pub(crate) hooks: Hooks<T>,
}

impl<T: 'static> Default for Options<T> {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
            strategy: strategy::default_strategy(),
            storage: None,
            hooks: Hooks::default(),
        }
    }
}

impl<T: 'static> Options<T> {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from the `refresher` section of the config.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut opts = Self::new()
            .with_retry_delay(schedule.retry_delay)
            .with_strategy(schedule.strategy.build::<T>());
        if let Some(name) = &schedule.name {
            opts = opts.with_name(name.clone());
        }
        opts
    }

    /// Sets the name used in logs and metrics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Overrides the delay before retrying a failed refresh.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Overrides the strategy used to compute the next refresh instant.
    pub fn with_strategy<S>(mut self, strategy: S) -> Self
    where
        S: RefreshStrategy<T> + 'static,
    {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Persists values across restarts through the given storage.
    pub fn with_storage<S>(mut self, storage: S) -> Self
    where
        S: Storage<T> + 'static,
    {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Same as [`Options::with_storage`] for a storage shared with other owners.
    pub fn with_shared_storage(mut self, storage: Arc<dyn Storage<T>>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn on_refresh_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Refreshable<T>>) + Send + Sync + 'static,
    {
        self.hooks.on_refresh_success = Some(Arc::new(f));
        self
    }

    pub fn on_refresh_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<anyhow::Error>) + Send + Sync + 'static,
    {
        self.hooks.on_refresh_failure = Some(Arc::new(f));
        self
    }

    pub fn on_storage_read_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Refreshable<T>>) + Send + Sync + 'static,
    {
        self.hooks.on_storage_read_success = Some(Arc::new(f));
        self
    }

    pub fn on_storage_read_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<anyhow::Error>) + Send + Sync + 'static,
    {
        self.hooks.on_storage_read_failure = Some(Arc::new(f));
        self
    }

    pub fn on_storage_write_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Refreshable<T>>) + Send + Sync + 'static,
    {
        self.hooks.on_storage_write_success = Some(Arc::new(f));
        self
    }

    pub fn on_storage_write_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<anyhow::Error>) + Send + Sync + 'static,
    {
        self.hooks.on_storage_write_failure = Some(Arc::new(f));
        self
    }

    /// Gets the configured name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the configured retry delay.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}
