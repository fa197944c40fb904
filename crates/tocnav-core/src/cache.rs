//! Directory listing cache
//!
//! Memoizes fetched listings by path with least-recently-used eviction, and tracks
//! outstanding fetches so each path has at most one in flight.

use crate::entry::{DirectoryNode, Entry};
use crate::error::FetchError;
use crate::path::DirPath;
use futures::future::{BoxFuture, Shared};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Result of a completed fetch, shared by every waiter
pub type Listing = Result<Arc<DirectoryNode>, FetchError>;

/// Outstanding fetch that any number of callers may await
pub type PendingListing = Shared<BoxFuture<'static, Listing>>;

/// Load status of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Listing is cached
    Loaded,
    /// Fetch is outstanding
    Loading,
    /// Neither cached nor being fetched
    Miss,
}

/// Capacity-bounded listing cache
///
/// Entries are kept in recency order: front is least recently used. The pinned path
/// (the directory on screen) is never evicted, so the cache may briefly hold one entry
/// over capacity when everything else is gone.
pub struct DirectoryCache {
    capacity: NonZeroUsize,
    nodes: IndexMap<DirPath, Arc<DirectoryNode>>,
    in_flight: HashMap<DirPath, PendingListing>,
    pinned: Option<DirPath>,
    clock: u64,
}

impl DirectoryCache {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            nodes: IndexMap::new(),
            in_flight: HashMap::new(),
            pinned: None,
            clock: 0,
        }
    }

    /// Configured capacity
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of cached listings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if nothing is cached
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a listing and mark it most recently used
    ///
    /// Never fetches; a miss is for the caller to handle.
    pub fn get(&mut self, path: &DirPath) -> Option<Arc<DirectoryNode>> {
        let idx = self.nodes.get_index_of(path)?;
        let last = self.nodes.len() - 1;
        self.nodes.move_index(idx, last);
        self.nodes.get_index(last).map(|(_, node)| Arc::clone(node))
    }

    /// Look up a listing without touching recency
    #[inline]
    #[must_use]
    pub fn peek(&self, path: &DirPath) -> Option<&Arc<DirectoryNode>> {
        self.nodes.get(path)
    }

    /// Store a listing, replacing any previous one for the same path
    pub fn put(&mut self, node: DirectoryNode) -> Arc<DirectoryNode> {
        let path = node.path().clone();
        let node = Arc::new(node);
        if self.nodes.shift_remove(&path).is_none() {
            while self.nodes.len() >= self.capacity.get() {
                if self.evict_least_recently_used().is_none() {
                    break;
                }
            }
        }
        self.nodes.insert(path, Arc::clone(&node));
        node
    }

    /// Drop the listing for `path`, returning it
    pub fn invalidate(&mut self, path: &DirPath) -> Option<Arc<DirectoryNode>> {
        self.nodes.shift_remove(path)
    }

    /// Evict the least recently used listing that is not pinned
    pub fn evict_least_recently_used(&mut self) -> Option<DirPath> {
        let idx = self
            .nodes
            .keys()
            .position(|path| Some(path) != self.pinned.as_ref())?;
        let (path, _) = self.nodes.shift_remove_index(idx)?;
        tracing::debug!(%path, "evicted least recently used listing");
        Some(path)
    }

    /// Protect `path` from eviction
    pub fn pin(&mut self, path: DirPath) {
        self.pinned = Some(path);
    }

    /// Currently pinned path
    #[inline]
    #[must_use]
    pub fn pinned(&self) -> Option<&DirPath> {
        self.pinned.as_ref()
    }

    /// Load status of `path`
    #[must_use]
    pub fn status(&self, path: &DirPath) -> CacheStatus {
        if self.in_flight.contains_key(path) {
            CacheStatus::Loading
        } else if self.nodes.contains_key(path) {
            CacheStatus::Loaded
        } else {
            CacheStatus::Miss
        }
    }

    /// Outstanding fetch for `path`, if any
    #[must_use]
    pub fn pending(&self, path: &DirPath) -> Option<PendingListing> {
        self.in_flight.get(path).cloned()
    }

    /// Record an outstanding fetch for `path`
    pub fn begin_fetch(&mut self, path: DirPath, pending: PendingListing) {
        self.in_flight.insert(path, pending);
    }

    /// Settle the outstanding fetch for `path` with its result
    ///
    /// Successful results are stamped and stored; failures leave the path a miss.
    ///
    /// # Errors
    /// Returns the fetch error, or [`FetchError::InvalidListing`] if the entries do not
    /// form a valid listing
    pub fn finish_fetch(
        &mut self,
        path: &DirPath,
        result: Result<Vec<Entry>, FetchError>,
    ) -> Listing {
        self.in_flight.remove(path);
        let entries = result?;
        self.clock += 1;
        let node = DirectoryNode::new(path.clone(), entries, self.clock)
            .map_err(|e| FetchError::InvalidListing(e.to_string()))?;
        Ok(self.put(node))
    }
}

impl std::fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("capacity", &self.capacity)
            .field("cached", &self.nodes.keys().collect::<Vec<_>>())
            .field("in_flight", &self.in_flight.keys().collect::<Vec<_>>())
            .field("pinned", &self.pinned)
            .finish()
    }
}
