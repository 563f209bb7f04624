use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::RefresherError;
use crate::model::Refreshable;
use crate::refresher::{telemetry, Options, Refresher};
use crate::tests::support::{assert_equal, eventually, ScriptedStorage, Source};
use crate::time;

#[tokio::test]
async fn test_stop_halts_refreshing() {
    let source = Source::new(Duration::from_millis(60));
    let refresher = Refresher::new(source.clone(), Options::new());
    refresher.wait_for_initial_value(Duration::from_secs(1)).await.unwrap();
    assert!(eventually(Duration::from_secs(1), || source.calls() >= 2).await);

    refresher.stop();
    assert!(refresher.is_stopped());
    sleep(Duration::from_millis(20)).await;
    let calls = source.calls();
    let value = refresher.current().unwrap();

    sleep(Duration::from_millis(200)).await;
    assert_equal(calls, source.calls());
    // Last known value remains readable after stop.
    assert!(Arc::ptr_eq(&value, &refresher.current().unwrap()));

    // Stopping twice is harmless.
    refresher.stop();
}

#[tokio::test]
async fn test_stop_before_init_releases_waiters() {
    let source = Source::new(Duration::from_secs(90));
    source.set_blocking(true);
    let refresher = Refresher::new(source.clone(), Options::new());

    let waiter = {
        let refresher = refresher.clone();
        tokio::spawn(async move { refresher.wait_for_initial_value(Duration::from_secs(5)).await })
    };
    assert!(eventually(Duration::from_secs(1), || source.calls() == 1).await);

    refresher.stop();
    let err = waiter.await.unwrap().expect_err("stopped");
    assert!(matches!(err, RefresherError::Stopped), "got {err}");
    assert!(refresher.current().is_none());
}

#[tokio::test]
async fn test_dropping_all_handles_stops_task() {
    let source = Source::new(Duration::from_millis(60));
    let refresher = Refresher::new(source.clone(), Options::new());
    refresher.wait_for_initial_value(Duration::from_secs(1)).await.unwrap();
    drop(refresher);

    sleep(Duration::from_millis(20)).await;
    let calls = source.calls();
    sleep(Duration::from_millis(200)).await;
    assert_equal(calls, source.calls());
}

#[tokio::test]
async fn test_panicking_hooks_do_not_break_the_loop() {
    let source = Source::new(Duration::from_millis(60));
    let opts = Options::new()
        .on_refresh_success(|_: Arc<Refreshable<String>>| panic!("hook exploded"))
        .on_refresh_failure(|_: Arc<anyhow::Error>| std::thread::sleep(Duration::from_secs(2)));
    let refresher = Refresher::new(source.clone(), opts);
    refresher.wait_for_initial_value(Duration::from_secs(1)).await.unwrap();

    assert!(eventually(Duration::from_secs(2), || source.produced() >= 4).await);
    assert!(refresher.stats().refresh_success >= 4);
    refresher.stop();
}

#[tokio::test]
async fn test_telemetry_logger_exits_on_stop() {
    let source = Source::new(Duration::from_secs(90));
    let refresher = Refresher::new(source, Options::new().with_name("telemetry"));
    refresher.wait_for_initial_value(Duration::from_secs(1)).await.unwrap();

    let logger = tokio::spawn(telemetry::logger(
        CancellationToken::new(),
        refresher.clone(),
        Duration::from_millis(10),
    ));
    sleep(Duration::from_millis(50)).await;
    assert!(!logger.is_finished());

    refresher.stop();
    tokio::time::timeout(Duration::from_secs(1), logger)
        .await
        .expect("logger exits after stop")
        .unwrap();
}

#[tokio::test]
async fn test_stop_during_storage_read_skips_refresh() {
    let storage = ScriptedStorage::new(None);
    storage.set_fail_get(true);
    storage.set_block_get(true);
    let source = Source::new(Duration::from_secs(90));
    let refresher = Refresher::new(source.clone(), Options::new().with_storage(storage.clone()));

    assert!(eventually(Duration::from_secs(1), || storage.gets() == 1).await);
    refresher.stop();
    sleep(Duration::from_millis(100)).await;

    // The failed read would normally fall back to a refresh.
    assert_equal(0, source.calls());
    assert!(refresher.current().is_none());
    assert!(matches!(
        refresher.wait_for_initial_value(Duration::from_millis(50)).await,
        Err(RefresherError::Stopped)
    ));
}

#[tokio::test]
async fn test_stop_during_storage_read_of_due_value_skips_refresh() {
    // Issued 70s ago with a 90s lifetime: already due, so a refresh would follow the read.
    let issued_at = time::sub(time::now(), Duration::from_secs(70));
    let due = Refreshable::new("old".to_string(), issued_at, time::add(issued_at, Duration::from_secs(90)));
    let storage = ScriptedStorage::new(Some(due));
    storage.set_block_get(true);
    let source = Source::new(Duration::from_secs(90));
    let refresher = Refresher::new(source.clone(), Options::new().with_storage(storage.clone()));

    assert!(eventually(Duration::from_secs(1), || storage.gets() == 1).await);
    refresher.stop();
    sleep(Duration::from_millis(100)).await;

    assert_equal(0, source.calls());
    assert!(refresher.current().is_none());
    assert!(storage.puts().is_empty());
}
