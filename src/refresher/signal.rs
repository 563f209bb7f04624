//! One-shot initialization outcome shared by any number of waiters.

use std::sync::Arc;
use tokio::sync::watch;

/// Outcome of the first acquisition attempt.
#[derive(Debug, Clone)]
pub enum InitOutcome {
    Ready,
    Failed(Arc<anyhow::Error>),
    Stopped,
}

/// Write-once latch. The first publish wins, later ones are ignored, and every
/// waiter (before or after the publish) observes the same outcome.
pub struct InitSignal {
    tx: watch::Sender<Option<InitOutcome>>,
}

impl InitSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Publishes the outcome. Returns false if one was already published.
    pub fn publish(&self, outcome: InitOutcome) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        })
    }

    /// Returns the outcome if already published.
    pub fn outcome(&self) -> Option<InitOutcome> {
        self.tx.borrow().clone()
    }

    /// Waits until an outcome is published.
    pub async fn wait(&self) -> InitOutcome {
        let mut rx = self.tx.subscribe();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone().unwrap_or(InitOutcome::Stopped),
            // The sender lives as long as self, so this is unreachable in practice.
            Err(_) => InitOutcome::Stopped,
        };
        outcome
    }
}

impl Default for InitSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_first_publish_wins() {
        let signal = InitSignal::new();
        assert!(signal.outcome().is_none());
        assert!(signal.publish(InitOutcome::Ready));
        assert!(!signal.publish(InitOutcome::Stopped));
        assert!(matches!(signal.outcome(), Some(InitOutcome::Ready)));
    }

    #[tokio::test]
    async fn test_many_waiters_observe_same_outcome() {
        let signal = Arc::new(InitSignal::new());
        let mut waiters = Vec::new();
        for _ in 0..8 {
            let signal = signal.clone();
            waiters.push(tokio::spawn(async move { signal.wait().await }));
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.publish(InitOutcome::Failed(Arc::new(anyhow::anyhow!("boom"))));

        for w in waiters {
            match w.await.unwrap() {
                InitOutcome::Failed(err) => assert_eq!(err.to_string(), "boom"),
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        // Late waiter does not hang on an already published signal.
        let late = tokio::time::timeout(Duration::from_millis(100), signal.wait()).await;
        assert!(matches!(late, Ok(InitOutcome::Failed(_))));
    }
}
