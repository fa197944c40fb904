//! Overlapping operations against a slow fetcher
//!
//! Time is paused so the fetcher's latency elapses only when every task is idle.

use std::sync::Arc;
use std::time::Duration;
use tocnav_core::{CacheStatus, TocError};
use tocnav_test_utils::{dir_path, runs_tree, setup_controller, TreeFetcher};
use tokio::time::timeout;

const LATENCY: Duration = Duration::from_millis(250);

fn slow_tree() -> Arc<TreeFetcher> {
    Arc::new(runs_tree().with_latency(LATENCY))
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_descents_fetch_once() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);
    toc.on_open().await;

    let (first, second) = tokio::join!(toc.on_descend("runs"), async {
        toc.on_ascend().await;
        toc.on_descend("runs").await
    });

    assert_eq!(fetcher.calls_for("/runs"), 1);
    assert!(second.is_ok());
    assert_eq!(second.view.path, dir_path("/runs"));
    assert_eq!(second.view.filtered_count, 12);
    // The first descent was superseded while its fetch was outstanding.
    assert!(first.is_ok());
    assert_eq!(toc.current_path(), dir_path("/runs"));
}

#[tokio::test(start_paused = true)]
async fn test_status_is_loading_while_fetch_outstanding() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);

    let (opened, observed) = tokio::join!(toc.on_open(), async {
        tokio::task::yield_now().await;
        toc.view()
    });

    assert!(observed.is_loading());
    assert_eq!(observed.status, CacheStatus::Loading);
    assert_eq!(opened.view.status, CacheStatus::Loaded);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_refreshes_fetch_once() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);
    toc.on_open().await;

    let (a, b) = tokio::join!(toc.on_refresh(), toc.on_refresh());
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(a.view, b.view);
    assert_eq!(fetcher.calls_for("/"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_completion_is_cached_but_not_shown() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);
    toc.on_open().await;

    let (descended, ascended) = tokio::join!(toc.on_descend("runs"), async {
        tokio::task::yield_now().await;
        toc.on_ascend().await
    });

    assert!(ascended.view.path.is_root());
    assert!(descended.view.path.is_root());
    assert!(descended.is_ok());
    assert_eq!(toc.depth(), 1);
    assert_eq!(toc.status(&dir_path("/runs")), CacheStatus::Loaded);

    toc.on_descend("runs").await;
    assert_eq!(fetcher.calls_for("/runs"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_does_not_roll_back() {
    let fetcher = slow_tree();
    fetcher.fail("/runs");
    let toc = setup_controller(&fetcher);
    toc.on_open().await;

    let (descended, _) = tokio::join!(toc.on_descend("runs"), async {
        tokio::task::yield_now().await;
        toc.on_ascend().await;
        toc.on_descend("benchmarks").await
    });

    assert!(descended.is_ok());
    assert_eq!(toc.current_path(), dir_path("/benchmarks"));
    assert_eq!(toc.status(&dir_path("/runs")), CacheStatus::Miss);
}

#[tokio::test(start_paused = true)]
async fn test_shared_failure_reaches_every_waiter() {
    let fetcher = slow_tree();
    fetcher.fail("/");
    let toc = setup_controller(&fetcher);

    let (a, b) = tokio::join!(toc.on_open(), toc.on_open());
    assert!(matches!(a.error, Some(TocError::Network(_))));
    assert!(matches!(b.error, Some(TocError::Network(_))));
    assert_eq!(fetcher.calls_for("/"), 1);
    assert_eq!(toc.status(&dir_path("/")), CacheStatus::Miss);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_descent_still_loads() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);
    toc.on_open().await;

    let abandoned = timeout(Duration::from_millis(10), toc.on_descend("runs")).await;
    assert!(abandoned.is_err());
    assert_eq!(toc.status(&dir_path("/runs")), CacheStatus::Loading);

    tokio::time::sleep(LATENCY * 2).await;
    assert_eq!(toc.status(&dir_path("/runs")), CacheStatus::Loaded);
    assert_eq!(toc.current_path(), dir_path("/runs"));
    assert_eq!(toc.view().filtered_count, 12);
    assert_eq!(fetcher.calls_for("/runs"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_failed_descent_still_rolls_back() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);
    toc.on_open().await;
    fetcher.fail("/runs");

    let abandoned = timeout(Duration::from_millis(10), toc.on_descend("runs")).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(LATENCY * 2).await;
    assert_ne!(toc.status(&dir_path("/runs")), CacheStatus::Loading);
    assert_eq!(toc.status(&dir_path("/runs")), CacheStatus::Miss);
    assert!(toc.current_path().is_root());
    assert_eq!(toc.view().entry_names(), ["runs", "benchmarks", "README.md"]);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_descent_joins_pending_load() {
    let fetcher = slow_tree();
    let toc = setup_controller(&fetcher);
    toc.on_open().await;

    let (first, second) = tokio::join!(toc.on_descend("runs"), toc.on_descend("runs"));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(second.view.path, dir_path("/runs"));
    assert_eq!(second.view.filtered_count, 12);
    assert_eq!(fetcher.calls_for("/runs"), 1);
    assert_eq!(toc.depth(), 2);
}
