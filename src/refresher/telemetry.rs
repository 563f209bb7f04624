// Package refresher provides periodic telemetry for a running refresher.

use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use super::counters::Stats;
use super::Refresher;
use crate::metrics;
use crate::time;

/// Logs refresher stats every `each` until the token is cancelled or the refresher stops.
pub async fn logger<T>(shutdown_token: CancellationToken, refresher: Refresher<T>, each: Duration) {
    let mut ticker = interval(each);
    let mut last = Stats::default();

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                tracing::debug!(svc = "refresher", name = %refresher.name(), "logger stopped");
                return;
            }
            _ = ticker.tick() => {
                if refresher.is_stopped() {
                    tracing::debug!(svc = "refresher", name = %refresher.name(), "logger stopped");
                    return;
                }

                let (current, next_refresh_at) = refresher.snapshot();
                let stats = refresher.stats();
                let next_refresh_in = time::until(next_refresh_at);
                metrics::set_next_refresh_in(refresher.name(), next_refresh_in.as_secs_f64());

                tracing::info!(
                    name = %refresher.name(),
                    ready = current.is_some(),
                    expires_at = ?current.as_ref().map(|c| c.expires_at),
                    next_refresh_in = %humantime::format_duration(truncate(next_refresh_in)),
                    refreshed = stats.refresh_success - last.refresh_success,
                    errors = stats.refresh_failure - last.refresh_failure,
                    storage_read_errors = stats.storage_read_failure - last.storage_read_failure,
                    storage_write_errors = stats.storage_write_failure - last.storage_write_failure,
                    "refresher stats"
                );
                last = stats;
            }
        }
    }
}

fn truncate(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}
