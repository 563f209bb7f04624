// Package shutdown provides graceful shutdown functionality.

use anyhow::Result;
use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
#[error("graceful shutdown timeout exceeded")]
pub struct TimeoutError;

/// Graceful shutdown handler: waits for Ctrl-C or cancellation, then gives
/// tracked tasks a bounded amount of time to finish.
pub struct GracefulShutdown {
    shutdown_token: CancellationToken,
    timeout: Duration,
    tasks: Mutex<JoinSet<()>>,
}

impl GracefulShutdown {
    /// Creates a new graceful shutdown handler
    pub fn new(shutdown_token: CancellationToken, timeout: Duration) -> Self {
        Self {
            shutdown_token,
            timeout,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Gets the shared shutdown token.
    pub fn token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Spawns a task that is awaited during shutdown.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.lock().spawn(fut);
    }

    /// Waits for shutdown signal and then waits for all tasks to complete
    pub async fn await_shutdown(&self) -> Result<()> {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!(
                    component = "graceful-shutdown",
                    event = "os_signal",
                    signal = "SIGINT",
                    "cancellation started"
                );
            }
            _ = self.shutdown_token.cancelled() => {
                info!(
                    component = "graceful-shutdown",
                    event = "ctx_done",
                    "cancellation started"
                );
            }
        }

        self.cancel_and_await_with_timeout().await
    }

    async fn cancel_and_await_with_timeout(&self) -> Result<()> {
        self.shutdown_token.cancel();

        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        let wait_all = async move { while tasks.join_next().await.is_some() {} };

        match timeout(self.timeout, wait_all).await {
            Ok(_) => {
                info!(
                    component = "graceful-shutdown",
                    event = "shutdown_success",
                    "service was gracefully shut down"
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    component = "graceful-shutdown",
                    event = "shutdown_timeout",
                    timeout_secs = self.timeout.as_secs(),
                    "not all tasks were closed within timeout"
                );
                Err(TimeoutError.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_waits_for_tracked_tasks() {
        let token = CancellationToken::new();
        let shutdown = GracefulShutdown::new(token.clone(), Duration::from_secs(1));
        let finished = Arc::new(AtomicBool::new(false));

        let task_token = shutdown.token();
        let task_finished = finished.clone();
        shutdown.spawn(async move {
            task_token.cancelled().await;
            task_finished.store(true, Ordering::SeqCst);
        });

        token.cancel();
        shutdown.await_shutdown().await.unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_times_out_on_stuck_task() {
        let token = CancellationToken::new();
        let shutdown = GracefulShutdown::new(token.clone(), Duration::from_millis(50));
        shutdown.spawn(std::future::pending());

        token.cancel();
        let err = shutdown.await_shutdown().await.unwrap_err();
        assert!(err.downcast_ref::<TimeoutError>().is_some());
    }
}
