//! TOC controller
//!
//! Composition root of the navigator. Owns the navigation stack, page state and listing
//! cache, and turns typed UI actions into views:
//! - Descent, ascent and reset move the stack and start at page 1 with no filter
//! - Search and paging are local and never fetch
//! - Missing listings are fetched through the [`DirectoryFetcher`], one fetch per path
//!
//! State is only touched inside short critical sections; the lock is never held across
//! a fetch, so overlapping operations interleave only at fetch boundaries.

use crate::cache::{CacheStatus, DirectoryCache, Listing, PendingListing};
use crate::config::TocConfig;
use crate::entry::DirectoryNode;
use crate::error::{FetchError, TocError};
use crate::fetch::DirectoryFetcher;
use crate::page::PageState;
use crate::path::DirPath;
use crate::search::SearchSpaceFilter;
use crate::stack::NavigationStack;
use crate::view::{Transition, ViewModel};
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Typed UI actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocAction {
    /// Load the current directory (first TOC fetch)
    Open,
    /// Enter a subdirectory of the current directory
    Descend(String),
    /// Go up one level
    Ascend,
    /// Return to the root (dataset switch)
    Reset,
    /// Filter the current directory; `None` or empty clears
    SetSearch(Option<String>),
    /// Jump to a 0-based page
    SetPage(usize),
    /// Re-fetch the current directory
    Refresh,
}

/// Navigation state restored when the load a transition depends on fails
#[derive(Debug, Clone)]
struct Checkpoint {
    stack: NavigationStack,
    page: PageState,
}

/// What to show if the fetch fails while its path is still on screen
enum Fallback {
    None,
    Restore(Checkpoint),
    Retained(Arc<DirectoryNode>),
}

#[derive(Debug)]
struct TocState {
    stack: NavigationStack,
    page: PageState,
    cache: DirectoryCache,
    /// Bumped on every stack change; a fetch whose epoch is outdated is stale
    epoch: u64,
    /// Listing kept on screen after its refresh failed
    retained: Option<Arc<DirectoryNode>>,
}

impl TocState {
    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            stack: self.stack.clone(),
            page: self.page.clone(),
        }
    }

    fn navigated(&mut self) {
        self.page.reset();
        self.epoch += 1;
        self.cache.pin(self.stack.current().clone());
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.stack = checkpoint.stack;
        self.page = checkpoint.page;
        self.epoch += 1;
        self.cache.pin(self.stack.current().clone());
    }

    /// Listing of the current directory: cached, else retained from a failed refresh
    fn listing(&self) -> Option<Arc<DirectoryNode>> {
        let path = self.stack.current();
        self.cache.peek(path).cloned().or_else(|| {
            self.retained
                .as_ref()
                .filter(|node| node.path() == path)
                .cloned()
        })
    }

    fn filtered_count(&self) -> usize {
        self.listing().map_or(0, |node| {
            SearchSpaceFilter::new(self.page.search_term())
                .apply(node.entries())
                .len()
        })
    }

    fn render(&mut self) -> ViewModel {
        let path = self.stack.current().clone();
        let node = self.listing();
        let status = self.cache.status(&path);
        ViewModel::render(&path, node.as_deref(), status, &mut self.page)
    }

    /// Apply the outcome of the fetch for `path` started at `epoch`
    fn conclude(
        &mut self,
        path: &DirPath,
        epoch: u64,
        outcome: Listing,
        fallback: Fallback,
    ) -> Transition {
        if self.epoch != epoch {
            tracing::debug!(%path, ok = outcome.is_ok(), "absorbed stale fetch completion");
            return Transition::ok(self.render());
        }
        match outcome {
            Ok(node) => {
                tracing::debug!(%path, entries = node.entries().len(), "listing loaded");
                if self.retained.as_ref().is_some_and(|kept| kept.path() == path) {
                    self.retained = None;
                }
                Transition::ok(self.render())
            }
            Err(error) => {
                tracing::warn!(%path, %error, "directory fetch failed");
                match fallback {
                    Fallback::None => {}
                    Fallback::Restore(checkpoint) => self.restore(checkpoint),
                    Fallback::Retained(node) => self.retained = Some(node),
                }
                Transition::failed(self.render(), TocError::Network(error))
            }
        }
    }
}

/// Navigator for one UI session
pub struct TocController {
    state: Arc<Mutex<TocState>>,
    fetcher: Arc<dyn DirectoryFetcher>,
}

impl TocController {
    /// Create controller positioned at the configured root; nothing is fetched yet
    #[must_use]
    pub fn new(config: TocConfig, fetcher: Arc<dyn DirectoryFetcher>) -> Self {
        let mut cache = DirectoryCache::new(config.cache_capacity);
        cache.pin(config.root_path.clone());
        Self {
            state: Arc::new(Mutex::new(TocState {
                stack: NavigationStack::new(config.root_path),
                page: PageState::new(config.per_page),
                cache,
                epoch: 0,
                retained: None,
            })),
            fetcher,
        }
    }

    /// Current view; never fetches
    #[must_use]
    pub fn view(&self) -> ViewModel {
        self.state.lock().render()
    }

    /// Directory being viewed
    #[must_use]
    pub fn current_path(&self) -> DirPath {
        self.state.lock().stack.current().clone()
    }

    /// Depth of the navigation stack, 1 at root
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state.lock().stack.depth()
    }

    /// Current page state
    #[must_use]
    pub fn page_state(&self) -> PageState {
        self.state.lock().page.clone()
    }

    /// Load status of `path`
    #[must_use]
    pub fn status(&self, path: &DirPath) -> CacheStatus {
        self.state.lock().cache.status(path)
    }

    /// Number of cached listings
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.state.lock().cache.len()
    }

    /// Run any action
    pub async fn dispatch(&self, action: TocAction) -> Transition {
        match action {
            TocAction::Open => self.on_open().await,
            TocAction::Descend(name) => self.on_descend(&name).await,
            TocAction::Ascend => self.on_ascend().await,
            TocAction::Reset => self.on_reset().await,
            TocAction::SetSearch(term) => self.on_set_search(term),
            TocAction::SetPage(index) => self.on_set_page(index),
            TocAction::Refresh => self.on_refresh().await,
        }
    }

    /// Load the current directory if it is not cached
    pub async fn on_open(&self) -> Transition {
        self.settle(Fallback::None).await
    }

    /// Enter subdirectory `name` of the current directory
    ///
    /// Rejected descents leave every piece of state untouched. Repeating a descent
    /// whose load is still outstanding waits for that load instead of descending again.
    pub async fn on_descend(&self, name: &str) -> Transition {
        let fallback = {
            let mut state = self.state.lock();
            let current = state.stack.current().clone();
            let repeated = current.last() == Some(name)
                && state.cache.status(&current) == CacheStatus::Loading;
            if repeated {
                tracing::debug!(path = %current, "attached to pending descent");
                Fallback::None
            } else {
                let checkpoint = state.checkpoint();
                let listing = state.listing();
                if let Err(error) = state.stack.descend(name, listing.as_deref()) {
                    tracing::debug!(%current, name, "rejected descent");
                    return Transition::failed(state.render(), error);
                }
                state.navigated();
                tracing::debug!(path = %state.stack.current(), "descended");
                Fallback::Restore(checkpoint)
            }
        };
        self.settle(fallback).await
    }

    /// Go up one level; no-op at root
    pub async fn on_ascend(&self) -> Transition {
        let checkpoint = {
            let mut state = self.state.lock();
            let checkpoint = state.checkpoint();
            if !state.stack.ascend() {
                return Transition::ok(state.render());
            }
            state.navigated();
            tracing::debug!(path = %state.stack.current(), "ascended");
            checkpoint
        };
        self.settle(Fallback::Restore(checkpoint)).await
    }

    /// Return to the root with a fresh page state
    pub async fn on_reset(&self) -> Transition {
        let checkpoint = {
            let mut state = self.state.lock();
            let checkpoint = state.checkpoint();
            state.stack.reset();
            state.navigated();
            tracing::debug!(path = %state.stack.current(), "reset");
            checkpoint
        };
        self.settle(Fallback::Restore(checkpoint)).await
    }

    /// Filter the current directory and return to its first page
    pub fn on_set_search(&self, term: Option<String>) -> Transition {
        let mut state = self.state.lock();
        state.page.set_search(term);
        Transition::ok(state.render())
    }

    /// Jump to 0-based `page_index`, clamped to the last page
    pub fn on_set_page(&self, page_index: usize) -> Transition {
        let mut state = self.state.lock();
        let count = state.filtered_count();
        state.page.set_page(page_index, count);
        Transition::ok(state.render())
    }

    /// Re-fetch the current directory, keeping stack and page state
    pub async fn on_refresh(&self) -> Transition {
        let retained = {
            let mut state = self.state.lock();
            let path = state.stack.current().clone();
            tracing::debug!(%path, "refresh");
            let shown = state.listing();
            state.cache.invalidate(&path);
            shown
        };
        let fallback = retained.map_or(Fallback::None, Fallback::Retained);
        self.settle(fallback).await
    }

    /// Make sure the current directory is loaded and render it
    async fn settle(&self, fallback: Fallback) -> Transition {
        let (path, epoch, pending) = {
            let mut state = self.state.lock();
            let path = state.stack.current().clone();
            if state.cache.get(&path).is_some() {
                return Transition::ok(state.render());
            }
            let pending = self.pending_for(&mut state.cache, &path);
            (path, state.epoch, pending)
        };

        let state = Arc::clone(&self.state);
        let conclusion = async move {
            let outcome = pending.await;
            state.lock().conclude(&path, epoch, outcome, fallback)
        };

        // Run the load to completion even if the caller stops waiting for it
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => match runtime.spawn(conclusion).await {
                Ok(transition) => transition,
                Err(error) => {
                    tracing::error!(%error, "load task did not complete");
                    Transition::ok(self.view())
                }
            },
            Err(_) => conclusion.await,
        }
    }

    /// Outstanding fetch for `path`, issuing one if none exists
    fn pending_for(&self, cache: &mut DirectoryCache, path: &DirPath) -> PendingListing {
        if let Some(pending) = cache.pending(path) {
            tracing::debug!(%path, "attached to outstanding fetch");
            return pending;
        }

        tracing::info!(%path, "fetching directory");
        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::downgrade(&self.state);
        let target = path.clone();
        let pending = async move {
            let result = fetcher.fetch_directory(&target).await;
            match state.upgrade() {
                Some(state) => state.lock().cache.finish_fetch(&target, result),
                None => Err(FetchError::Network("navigator closed".to_string())),
            }
        }
        .boxed()
        .shared();
        cache.begin_fetch(path.clone(), pending.clone());
        pending
    }
}

impl std::fmt::Debug for TocController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TocController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
