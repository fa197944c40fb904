//! Read-only view handed to the UI

use crate::cache::CacheStatus;
use crate::entry::{DirectoryNode, Entry};
use crate::error::TocError;
use crate::page::{PageState, PageWindow};
use crate::path::DirPath;
use crate::search::SearchSpaceFilter;
use serde::Serialize;

/// Snapshot of the current directory after filtering and pagination
///
/// Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Directory being viewed
    pub path: DirPath,
    /// Entries on the current page
    pub visible_entries: Vec<Entry>,
    /// 0-based page index
    pub current_page_index: usize,
    /// Total pages, at least 1
    pub total_pages: usize,
    /// Entries matching the search term across all pages
    pub filtered_count: usize,
    /// Active search term
    pub search_term: Option<String>,
    /// Load status of `path`
    pub status: CacheStatus,
}

impl ViewModel {
    /// Build the view of `node` under `page`, re-clamping the page offset to the
    /// filtered entry count
    pub(crate) fn render(
        path: &DirPath,
        node: Option<&DirectoryNode>,
        status: CacheStatus,
        page: &mut PageState,
    ) -> Self {
        let entries = node.map(DirectoryNode::entries).unwrap_or_default();
        let filtered = SearchSpaceFilter::new(page.search_term()).apply(entries);
        page.reclamp(filtered.len());
        let window = PageWindow::slice(&filtered, page.offset(), page.per_page());

        Self {
            path: path.clone(),
            visible_entries: window.visible.iter().map(|e| (*e).clone()).collect(),
            current_page_index: window.page_index,
            total_pages: window.total_pages,
            filtered_count: filtered.len(),
            search_term: page.search_term().map(str::to_string),
            status,
        }
    }

    /// 1-based page number for display
    #[inline]
    #[must_use]
    pub fn page_number(&self) -> usize {
        self.current_page_index + 1
    }

    /// Check if the listing is still being fetched
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == CacheStatus::Loading
    }

    /// Names of visible entries
    #[must_use]
    pub fn entry_names(&self) -> Vec<&str> {
        self.visible_entries.iter().map(Entry::name).collect()
    }
}

/// Outcome of a controller operation
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// View after the operation
    pub view: ViewModel,
    /// Error the UI may choose to surface
    pub error: Option<TocError>,
}

impl Transition {
    /// Successful transition
    #[inline]
    #[must_use]
    pub fn ok(view: ViewModel) -> Self {
        Self { view, error: None }
    }

    /// Failed transition; `view` is the last known good display
    #[inline]
    #[must_use]
    pub fn failed(view: ViewModel, error: TocError) -> Self {
        Self {
            view,
            error: Some(error),
        }
    }

    /// Check if no error was reported
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
