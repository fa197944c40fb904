//! tocnav core - lazily loaded table-of-contents navigation
//!
//! Drives a hierarchical directory browser backed by a slow remote listing service:
//! - Navigation stack of visited directories with descend, ascend and reset
//! - LRU listing cache with at most one outstanding fetch per path
//! - Case-insensitive search over the current directory
//! - Fixed-size pagination with clamped page offsets
//!
//! Every operation returns a [`Transition`]: the view to render, plus an error the UI
//! may surface. Failed loads roll back to the last view that rendered.
//!
//! # Example
//!
//! ```rust,ignore
//! use tocnav_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(fetcher: Arc<dyn DirectoryFetcher>) {
//! let toc = TocController::new(TocConfig::new(), fetcher);
//!
//! let opened = toc.on_open().await;
//! println!("{} entries at {}", opened.view.filtered_count, opened.view.path);
//!
//! let inside = toc.on_descend("runs").await;
//! if let Some(error) = inside.error {
//!     eprintln!("{error}");
//! }
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod page;
pub mod path;
pub mod search;
pub mod stack;
pub mod view;

// Re-exports for convenience
pub use cache::{CacheStatus, DirectoryCache, Listing, PendingListing};
pub use config::{ConfigError, DatasetView, TocConfig, DEFAULT_CACHE_CAPACITY};
pub use controller::{TocAction, TocController};
pub use entry::{DirectoryNode, Entry, EntryError, EntryKind, Metadata};
pub use error::{FetchError, TocError};
pub use fetch::DirectoryFetcher;
pub use metadata::{MetadataClass, MetadataKey};
pub use page::{PageSlice, PageState, PageWindow};
pub use path::{DirPath, PathError};
pub use search::SearchSpaceFilter;
pub use stack::NavigationStack;
pub use view::{Transition, ViewModel};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a navigator
    pub use crate::{
        CacheStatus, DirPath, DirectoryFetcher, Entry, EntryKind, FetchError, TocAction,
        TocConfig, TocController, TocError, Transition, ViewModel,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
