use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::model::Refreshable;
use crate::refresher::RefreshFn;
use crate::time;

/// Scripted refresh function producing "v1", "v2", ... on each successful call.
#[derive(Clone)]
pub struct Source {
    inner: Arc<Inner>,
}

struct Inner {
    calls: AtomicUsize,
    produced: AtomicUsize,
    failing: AtomicBool,
    blocking: AtomicBool,
    ttl: Duration,
    issued_ago: Duration,
}

impl Source {
    /// Values are issued now and live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self::issued_ago(ttl, Duration::ZERO)
    }

    /// Values are issued `ago` in the past and live for `ttl` from issuance.
    pub fn issued_ago(ttl: Duration, ago: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                calls: AtomicUsize::new(0),
                produced: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
                blocking: AtomicBool::new(false),
                ttl,
                issued_ago: ago,
            }),
        }
    }

    /// Number of times the refresh function was invoked.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Number of values successfully produced.
    pub fn produced(&self) -> usize {
        self.inner.produced.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, v: bool) {
        self.inner.failing.store(v, Ordering::SeqCst);
    }

    /// While set, calls hang until the refresher is stopped.
    pub fn set_blocking(&self, v: bool) {
        self.inner.blocking.store(v, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl RefreshFn<String> for Source {
    async fn refresh(&self, ctx: CancellationToken) -> Result<Refreshable<String>> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        if self.inner.blocking.load(Ordering::SeqCst) {
            ctx.cancelled().await;
            return Err(anyhow!("cancelled"));
        }
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("source unavailable"));
        }

        let n = self.inner.produced.fetch_add(1, Ordering::SeqCst) + 1;
        let issued_at = time::sub(time::now(), self.inner.issued_ago);
        Ok(Refreshable::new(format!("v{n}"), issued_at, time::add(issued_at, self.inner.ttl)))
    }
}
