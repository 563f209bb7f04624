// Package refresher keeps an expiring value fresh in the background.

use anyhow::Result;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use super::counters::{Counters, Stats};
use super::hooks::{self, Hooks};
use super::options::Options;
use super::signal::{InitOutcome, InitSignal};
use crate::error::RefresherError;
use crate::metrics;
use crate::model::Refreshable;
use crate::storage::Storage;
use crate::strategy::RefreshStrategy;
use crate::time;

/// RefreshFn produces a new generation of the managed value.
///
/// On error the refresher keeps its previous value and schedule. The token is
/// cancelled when the refresher stops; implementations may watch it to abort early.
#[async_trait::async_trait]
pub trait RefreshFn<T>: Send + Sync {
    async fn refresh(&self, ctx: CancellationToken) -> Result<Refreshable<T>>;
}

#[async_trait::async_trait]
impl<T, F, Fut> RefreshFn<T> for F
where
    T: Send + 'static,
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Refreshable<T>>> + Send + 'static,
{
    async fn refresh(&self, ctx: CancellationToken) -> Result<Refreshable<T>> {
        (self)(ctx).await
    }
}

/// Current value and schedule, always swapped together so readers never see
/// a new value paired with an old schedule.
struct State<T> {
    current: Option<Arc<Refreshable<T>>>,
    next_refresh_at: DateTime<Utc>,
}

struct Shared<T> {
    name: String,
    state: ArcSwap<State<T>>,
    init: InitSignal,
    shutdown_token: CancellationToken,
    counters: Counters,
}

impl<T> Shared<T> {
    fn commit(&self, value: Arc<Refreshable<T>>, next_refresh_at: DateTime<Utc>) {
        self.state.store(Arc::new(State {
            current: Some(value),
            next_refresh_at,
        }));
        metrics::set_next_refresh_in(&self.name, time::until(next_refresh_at).as_secs_f64());
    }
}

/// Refresher keeps a short-lived value fresh.
///
/// One background task per refresher does all the refreshing; any number of
/// clones of the handle may read concurrently. The task stops on [`Refresher::stop`]
/// or once every handle has been dropped.
pub struct Refresher<T> {
    shared: Arc<Shared<T>>,
    _guard: Arc<DropGuard>,
}

impl<T> Clone for Refresher<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            _guard: self._guard.clone(),
        }
    }
}

impl<T> Refresher<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a refresher and starts its background task on the current tokio runtime.
    ///
    /// The recommended usage is to call [`Refresher::wait_for_initial_value`] right after.
    pub fn new<F>(refresh_fn: F, opts: Options<T>) -> Self
    where
        F: RefreshFn<T> + 'static,
    {
        let shutdown_token = CancellationToken::new();
        let shared = Arc::new(Shared {
            name: opts.name,
            state: ArcSwap::from_pointee(State {
                current: None,
                next_refresh_at: time::now(),
            }),
            init: InitSignal::new(),
            shutdown_token: shutdown_token.clone(),
            counters: Counters::new(),
        });

        let worker = Worker {
            shared: shared.clone(),
            refresh_fn: Box::new(refresh_fn),
            strategy: opts.strategy,
            storage: opts.storage,
            retry_delay: opts.retry_delay,
            hooks: opts.hooks,
        };
        tokio::spawn(worker.run());

        Self {
            shared,
            _guard: Arc::new(shutdown_token.drop_guard()),
        }
    }

    /// Returns as soon as an initial value is available, or fails with a timeout or
    /// the initial acquisition error, whichever comes first.
    ///
    /// Returns immediately if a value is already present. Safe to call from any
    /// number of tasks, before or after initialization completed.
    pub async fn wait_for_initial_value(&self, timeout: Duration) -> Result<(), RefresherError> {
        if self.current().is_some() {
            return Ok(());
        }

        match tokio::time::timeout(timeout, self.shared.init.wait()).await {
            Err(_) => Err(RefresherError::Timeout { timeout }),
            Ok(InitOutcome::Ready) => Ok(()),
            Ok(InitOutcome::Failed(err)) => Err(RefresherError::Initialization(err)),
            Ok(InitOutcome::Stopped) => Err(RefresherError::Stopped),
        }
    }
}

impl<T> Refresher<T> {
    /// Returns the current value, or `None` before the first successful acquisition.
    pub fn current(&self) -> Option<Arc<Refreshable<T>>> {
        self.shared.state.load().current.clone()
    }

    /// Returns the currently scheduled refresh instant. Meaningful after initialization.
    pub fn next_refresh_at(&self) -> DateTime<Utc> {
        self.shared.state.load().next_refresh_at
    }

    /// Returns current value and scheduled refresh instant from the same snapshot.
    pub fn snapshot(&self) -> (Option<Arc<Refreshable<T>>>, DateTime<Utc>) {
        let state = self.shared.state.load();
        (state.current.clone(), state.next_refresh_at)
    }

    /// Requests the background task to exit at its next suspension point.
    /// Does not wait for it to exit.
    pub fn stop(&self) {
        self.shared.shutdown_token.cancel();
        self.shared.init.publish(InitOutcome::Stopped);
    }

    /// Checks whether stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.shared.shutdown_token.is_cancelled()
    }

    /// Gets the refresher name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Returns a snapshot of refresh and storage counters.
    pub fn stats(&self) -> Stats {
        self.shared.counters.snapshot()
    }
}

/// Outcome of one refresh attempt.
enum Attempt {
    Refreshed(DateTime<Utc>),
    Failed(Arc<anyhow::Error>),
    /// The refresher was stopped while the call was in flight; its result was discarded.
    Stopped,
}

/// The single background task owning all writes to the shared state.
struct Worker<T> {
    shared: Arc<Shared<T>>,
    refresh_fn: Box<dyn RefreshFn<T>>,
    strategy: Arc<dyn RefreshStrategy<T>>,
    storage: Option<Arc<dyn Storage<T>>>,
    retry_delay: Duration,
    hooks: Hooks<T>,
}

impl<T> Worker<T>
where
    T: Send + Sync + 'static,
{
    async fn run(self) {
        let ctx = self.shared.shutdown_token.clone();

        let mut delay = match self.initialize(&ctx).await {
            Some(delay) => delay,
            None => {
                self.log_stopped();
                return;
            }
        };

        loop {
            tokio::select! {
                biased;
                _ = ctx.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }

            delay = match self.refresh(&ctx).await {
                Attempt::Refreshed(next_refresh_at) => time::until(next_refresh_at),
                Attempt::Failed(_) => self.retry_delay,
                Attempt::Stopped => break,
            };
        }

        self.log_stopped();
    }

    /// Runs once: adopts a still-fresh stored value or performs the first refresh,
    /// then publishes the outcome. Returns the delay until the first steady-state
    /// refresh, or `None` if stopped meanwhile.
    async fn initialize(&self, ctx: &CancellationToken) -> Option<Duration> {
        let name = &self.shared.name;

        if let Some(loaded) = self.load(ctx).await {
            let next_refresh_at = self.strategy.refresh_at(&loaded);
            if time::now() < next_refresh_at {
                if ctx.is_cancelled() {
                    return None;
                }
                self.shared.commit(loaded.clone(), next_refresh_at);
                self.shared.init.publish(InitOutcome::Ready);
                info!(
                    component = "refresher",
                    name = %name,
                    event = "init_from_storage",
                    expires_at = %loaded.expires_at,
                    next_refresh_at = %next_refresh_at,
                    "initial value loaded from storage"
                );
                return Some(time::until(next_refresh_at));
            }
            debug!(
                component = "refresher",
                name = %name,
                event = "init_storage_stale",
                expires_at = %loaded.expires_at,
                due_at = %next_refresh_at,
                "stored value already due, refreshing instead"
            );
        }

        match self.refresh(ctx).await {
            Attempt::Stopped => None,
            Attempt::Refreshed(next_refresh_at) => {
                self.shared.init.publish(InitOutcome::Ready);
                info!(
                    component = "refresher",
                    name = %name,
                    event = "init_refreshed",
                    next_refresh_at = %next_refresh_at,
                    "initial value acquired"
                );
                Some(time::until(next_refresh_at))
            }
            Attempt::Failed(err) => {
                // The only place an error reaches the initialization signal.
                self.shared.init.publish(InitOutcome::Failed(err));
                warn!(
                    component = "refresher",
                    name = %name,
                    event = "init_failed",
                    retry_in = %humantime::format_duration(self.retry_delay),
                    "initial value acquisition failed"
                );
                Some(self.retry_delay)
            }
        }
    }

    /// Reads a stored value. Failures are reported and treated as "nothing stored".
    async fn load(&self, ctx: &CancellationToken) -> Option<Arc<Refreshable<T>>> {
        let storage = self.storage.as_ref()?;
        let name = &self.shared.name;

        match storage.get(ctx.clone()).await {
            Ok(loaded) => {
                let loaded = Arc::new(loaded);
                self.shared.counters.storage_read(name);
                hooks::fire_value(name, &self.hooks.on_storage_read_success, &loaded);
                Some(loaded)
            }
            Err(e) => {
                let err = Arc::new(e);
                self.shared.counters.storage_read_failed(name);
                warn!(
                    component = "refresher",
                    name = %name,
                    event = "storage_read_failed",
                    error = %format!("{err:#}"),
                    "failed to read stored value"
                );
                hooks::fire_error(name, &self.hooks.on_storage_read_failure, &err);
                None
            }
        }
    }

    /// Invokes the refresh function and commits the result. On failure the previous
    /// value and schedule stay in place.
    async fn refresh(&self, ctx: &CancellationToken) -> Attempt {
        let name = &self.shared.name;
        if ctx.is_cancelled() {
            return Attempt::Stopped;
        }
        let result = self.refresh_fn.refresh(ctx.clone()).await;
        if ctx.is_cancelled() {
            return Attempt::Stopped;
        }

        match result {
            Ok(value) => {
                let value = Arc::new(value);
                let next_refresh_at = self.strategy.refresh_at(&value);
                self.shared.commit(value.clone(), next_refresh_at);
                self.shared.counters.refreshed(name);
                debug!(
                    component = "refresher",
                    name = %name,
                    event = "refresh_success",
                    issued_at = %value.issued_at,
                    expires_at = %value.expires_at,
                    next_refresh_at = %next_refresh_at,
                    "value refreshed"
                );
                hooks::fire_value(name, &self.hooks.on_refresh_success, &value);
                self.persist(ctx, value).await;
                Attempt::Refreshed(next_refresh_at)
            }
            Err(e) => {
                let err = Arc::new(e);
                self.shared.counters.refresh_failed(name);
                warn!(
                    component = "refresher",
                    name = %name,
                    event = "refresh_failed",
                    error = %format!("{err:#}"),
                    retry_in = %humantime::format_duration(self.retry_delay),
                    "refresh failed, keeping previous value"
                );
                hooks::fire_error(name, &self.hooks.on_refresh_failure, &err);
                Attempt::Failed(err)
            }
        }
    }

    /// Writes a freshly acquired value to storage, if any is configured.
    async fn persist(&self, ctx: &CancellationToken, value: Arc<Refreshable<T>>) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        let name = &self.shared.name;

        match storage.put(ctx.clone(), value.clone()).await {
            Ok(()) => {
                self.shared.counters.storage_written(name);
                hooks::fire_value(name, &self.hooks.on_storage_write_success, &value);
            }
            Err(e) => {
                let err = Arc::new(e);
                self.shared.counters.storage_write_failed(name);
                warn!(
                    component = "refresher",
                    name = %name,
                    event = "storage_write_failed",
                    error = %format!("{err:#}"),
                    "failed to persist value"
                );
                hooks::fire_error(name, &self.hooks.on_storage_write_failure, &err);
            }
        }
    }

    fn log_stopped(&self) {
        info!(component = "refresher", name = %self.shared.name, event = "stopped", "refresher stopped");
    }
}
