use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::model::Refreshable;
use crate::storage::Storage;

/// Storage with a pre-seeded value, switchable failures and a log of puts.
#[derive(Clone)]
pub struct ScriptedStorage {
    inner: Arc<Inner>,
}

struct Inner {
    stored: Mutex<Option<Refreshable<String>>>,
    puts: Mutex<Vec<Arc<Refreshable<String>>>>,
    gets: AtomicUsize,
    fail_get: AtomicBool,
    fail_put: AtomicBool,
    block_get: AtomicBool,
}

impl ScriptedStorage {
    pub fn new(stored: Option<Refreshable<String>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                stored: Mutex::new(stored),
                puts: Mutex::new(Vec::new()),
                gets: AtomicUsize::new(0),
                fail_get: AtomicBool::new(false),
                fail_put: AtomicBool::new(false),
                block_get: AtomicBool::new(false),
            }),
        }
    }

    pub fn set_fail_get(&self, v: bool) {
        self.inner.fail_get.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_put(&self, v: bool) {
        self.inner.fail_put.store(v, Ordering::SeqCst);
    }

    /// Makes `get` park until its token is cancelled before answering.
    pub fn set_block_get(&self, v: bool) {
        self.inner.block_get.store(v, Ordering::SeqCst);
    }

    pub fn gets(&self) -> usize {
        self.inner.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> Vec<Arc<Refreshable<String>>> {
        self.inner.puts.lock().clone()
    }
}

#[async_trait::async_trait]
impl Storage<String> for ScriptedStorage {
    async fn get(&self, ctx: CancellationToken) -> Result<Refreshable<String>> {
        self.inner.gets.fetch_add(1, Ordering::SeqCst);
        if self.inner.block_get.load(Ordering::SeqCst) {
            ctx.cancelled().await;
        }
        if self.inner.fail_get.load(Ordering::SeqCst) {
            return Err(anyhow!("storage read failed"));
        }
        self.inner
            .stored
            .lock()
            .clone()
            .ok_or_else(|| anyhow!("nothing stored"))
    }

    async fn put(&self, _ctx: CancellationToken, value: Arc<Refreshable<String>>) -> Result<()> {
        if self.inner.fail_put.load(Ordering::SeqCst) {
            return Err(anyhow!("storage write failed"));
        }
        *self.inner.stored.lock() = Some(value.as_ref().clone());
        self.inner.puts.lock().push(value);
        Ok(())
    }
}
