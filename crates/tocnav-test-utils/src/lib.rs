//! Testing utilities for tocnav workspace
//!
//! In-memory directory tree fetcher plus entry and path helpers.

#![allow(missing_docs, clippy::missing_panics_doc, clippy::must_use_candidate)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tocnav_core::{DirPath, DirectoryFetcher, Entry, FetchError, TocConfig, TocController};

/// Fetcher over an in-memory tree with call counting and failure injection
#[derive(Debug, Default)]
pub struct TreeFetcher {
    tree: Mutex<HashMap<DirPath, Vec<Entry>>>,
    calls: Mutex<HashMap<DirPath, usize>>,
    failing: Mutex<HashSet<DirPath>>,
    latency: Option<Duration>,
}

impl TreeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: &str, entries: Vec<Entry>) -> Self {
        self.set_dir(path, entries);
        self
    }

    /// Delay every fetch; pair with paused tokio time
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the listing of `path`
    pub fn set_dir(&self, path: &str, entries: Vec<Entry>) {
        self.tree.lock().insert(dir_path(path), entries);
    }

    /// Make fetches of `path` fail with a network error
    pub fn fail(&self, path: &str) {
        self.failing.lock().insert(dir_path(path));
    }

    /// Undo [`TreeFetcher::fail`]
    pub fn heal(&self, path: &str) {
        self.failing.lock().remove(&dir_path(path));
    }

    pub fn calls_for(&self, path: &str) -> usize {
        self.calls.lock().get(&dir_path(path)).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl DirectoryFetcher for TreeFetcher {
    async fn fetch_directory(&self, path: &DirPath) -> Result<Vec<Entry>, FetchError> {
        *self.calls.lock().entry(path.clone()).or_default() += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.lock().contains(path) {
            return Err(FetchError::Network(format!("connection reset fetching {path}")));
        }
        self.tree
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.clone()))
    }
}

pub fn dir_path(s: &str) -> DirPath {
    s.parse().unwrap()
}

pub fn dir(name: &str) -> Entry {
    Entry::subdirectory(name).unwrap()
}

pub fn file(name: &str) -> Entry {
    Entry::file(name).unwrap()
}

/// `count` files named `{prefix}-01`, `{prefix}-02`, ...
pub fn numbered_files(prefix: &str, count: usize) -> Vec<Entry> {
    (1..=count).map(|i| file(&format!("{prefix}-{i:02}"))).collect()
}

/// Dataset tree used across navigation tests
///
/// ```text
/// /                 runs/ benchmarks/ README.md
/// /runs             run-01 .. run-12
/// /benchmarks       benchmark-a benchmark-b other fio/
/// /benchmarks/fio   result.json
/// ```
pub fn runs_tree() -> TreeFetcher {
    TreeFetcher::new()
        .with_dir("/", vec![dir("runs"), dir("benchmarks"), file("README.md")])
        .with_dir("/runs", numbered_files("run", 12))
        .with_dir(
            "/benchmarks",
            vec![
                file("benchmark-a"),
                file("benchmark-b"),
                file("other"),
                dir("fio"),
            ],
        )
        .with_dir("/benchmarks/fio", vec![file("result.json")])
}

/// Controller over `fetcher` with default configuration
pub fn setup_controller(fetcher: &Arc<TreeFetcher>) -> TocController {
    setup_controller_with(fetcher, TocConfig::default())
}

pub fn setup_controller_with(fetcher: &Arc<TreeFetcher>, config: TocConfig) -> TocController {
    TocController::new(config, Arc::clone(fetcher) as Arc<dyn DirectoryFetcher>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tree_fetcher_counts_and_fails() {
        let fetcher = runs_tree();
        let root = fetcher.fetch_directory(&DirPath::root()).await.unwrap();
        assert_eq!(root.len(), 3);
        assert_eq!(fetcher.calls_for("/"), 1);

        fetcher.fail("/runs");
        assert!(fetcher.fetch_directory(&dir_path("/runs")).await.is_err());
        fetcher.heal("/runs");
        assert_eq!(fetcher.fetch_directory(&dir_path("/runs")).await.unwrap().len(), 12);
        assert_eq!(fetcher.total_calls(), 3);
    }

    #[tokio::test]
    async fn missing_directory_is_not_found() {
        let fetcher = TreeFetcher::new();
        let err = fetcher.fetch_directory(&dir_path("/nope")).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound(dir_path("/nope")));
    }
}
