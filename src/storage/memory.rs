use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::Storage;
use crate::model::Refreshable;

/// In-process storage holding a single slot.
///
/// Survives refresher restarts within one process, which makes it handy for
/// tests and for handing a value over between successive refreshers.
pub struct MemoryStorage<T> {
    slot: Mutex<Option<Arc<Refreshable<T>>>>,
}

impl<T> MemoryStorage<T> {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Creates a storage pre-filled with a value.
    pub fn with_value(value: Refreshable<T>) -> Self {
        Self {
            slot: Mutex::new(Some(Arc::new(value))),
        }
    }

    /// Returns the currently stored value, if any.
    pub fn stored(&self) -> Option<Arc<Refreshable<T>>> {
        self.slot.lock().clone()
    }

    /// Drops the stored value.
    pub fn clear(&self) {
        self.slot.lock().take();
    }
}

impl<T> Default for MemoryStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T> Storage<T> for MemoryStorage<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, _ctx: CancellationToken) -> Result<Refreshable<T>> {
        self.slot
            .lock()
            .as_deref()
            .cloned()
            .ok_or_else(|| anyhow!("no value stored"))
    }

    async fn put(&self, _ctx: CancellationToken, value: Arc<Refreshable<T>>) -> Result<()> {
        *self.slot.lock() = Some(value);
        Ok(())
    }
}
