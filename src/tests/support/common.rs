use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Polls `f` until it returns true or `timeout` elapses.
pub async fn eventually<F: Fn() -> bool>(timeout: Duration, f: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if f() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(5)).await;
    }
}

/// Thread-safe list used to record hook invocations.
pub struct Recorder<V> {
    items: Arc<Mutex<Vec<V>>>,
}

impl<V> Clone for Recorder<V> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<V: Clone + Send + 'static> Recorder<V> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn items(&self) -> Vec<V> {
        self.items.lock().clone()
    }

    /// Returns a hook closure pushing every argument it receives.
    pub fn hook(&self) -> impl Fn(V) + Send + Sync + 'static {
        let items = self.items.clone();
        move |v| items.lock().push(v)
    }
}

/// Asserts that two values are equal.
pub fn assert_equal<T: PartialEq + std::fmt::Debug>(want: T, got: T) {
    if want != got {
        panic!("want={:?} got={:?}", want, got);
    }
}
