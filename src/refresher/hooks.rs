// Package refresher provides fire-and-forget notification hooks.

use std::sync::Arc;
use tracing::warn;

use crate::model::Refreshable;

/// Hook receiving a value (refresh success, storage read/write success).
pub type ValueHook<T> = Arc<dyn Fn(Arc<Refreshable<T>>) + Send + Sync>;

/// Hook receiving an error (refresh failure, storage read/write failure).
pub type ErrorHook = Arc<dyn Fn(Arc<anyhow::Error>) + Send + Sync>;

/// Optional side-effect callbacks. All default to no-op.
pub struct Hooks<T> {
    pub on_refresh_success: Option<ValueHook<T>>,
    pub on_refresh_failure: Option<ErrorHook>,
    pub on_storage_read_success: Option<ValueHook<T>>,
    pub on_storage_read_failure: Option<ErrorHook>,
    pub on_storage_write_success: Option<ValueHook<T>>,
    pub on_storage_write_failure: Option<ErrorHook>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            on_refresh_success: None,
            on_refresh_failure: None,
            on_storage_read_success: None,
            on_storage_read_failure: None,
            on_storage_write_success: None,
            on_storage_write_failure: None,
        }
    }
}

impl<T> Clone for Hooks<T> {
    fn clone(&self) -> Self {
        Self {
            on_refresh_success: self.on_refresh_success.clone(),
            on_refresh_failure: self.on_refresh_failure.clone(),
            on_storage_read_success: self.on_storage_read_success.clone(),
            on_storage_read_failure: self.on_storage_read_failure.clone(),
            on_storage_write_success: self.on_storage_write_success.clone(),
            on_storage_write_failure: self.on_storage_write_failure.clone(),
        }
    }
}

/// Runs a value hook on the blocking pool without awaiting it.
pub(crate) fn fire_value<T>(name: &str, hook: &Option<ValueHook<T>>, value: &Arc<Refreshable<T>>)
where
    T: Send + Sync + 'static,
{
    if let Some(hook) = hook {
        let hook = hook.clone();
        let value = value.clone();
        spawn_detached(name, move || hook(value));
    }
}

/// Runs an error hook on the blocking pool without awaiting it.
pub(crate) fn fire_error(name: &str, hook: &Option<ErrorHook>, err: &Arc<anyhow::Error>) {
    if let Some(hook) = hook {
        let hook = hook.clone();
        let err = err.clone();
        spawn_detached(name, move || hook(err));
    }
}

fn spawn_detached<F>(name: &str, f: F)
where
    F: FnOnce() + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);
    let name = name.to_string();
    // Watch for panics so they get logged instead of vanishing with the handle.
    tokio::spawn(async move {
        if let Err(e) = handle.await {
            if e.is_panic() {
                warn!(component = "refresher", name = %name, event = "hook_panicked", "hook panicked");
            }
        }
    });
}
