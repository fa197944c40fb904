//! Pagination arithmetic and per-directory page state
//!
//! Page indices are 0-based. Offsets are always aligned to the page size.

use std::num::NonZeroUsize;

/// One page cut out of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    /// Items on this page
    pub visible: &'a [T],
    /// Offset the page actually starts at
    pub offset: usize,
    /// 0-based index of this page
    pub page_index: usize,
    /// Total number of pages, never less than 1
    pub total_pages: usize,
}

/// Pure pagination arithmetic
#[derive(Debug, Clone, Copy, Default)]
pub struct PageWindow;

impl PageWindow {
    /// `ceil(count / per_page)`, minimum 1
    #[inline]
    #[must_use]
    pub fn total_pages(count: usize, per_page: NonZeroUsize) -> usize {
        count.div_ceil(per_page.get()).max(1)
    }

    /// Offset of the last full-or-partial page
    #[inline]
    #[must_use]
    pub fn last_page_offset(count: usize, per_page: NonZeroUsize) -> usize {
        (Self::total_pages(count, per_page) - 1) * per_page.get()
    }

    /// Align `offset` down to a page boundary and keep it within the last page
    #[inline]
    #[must_use]
    pub fn clamp_offset(offset: usize, count: usize, per_page: NonZeroUsize) -> usize {
        let aligned = offset - offset % per_page.get();
        aligned.min(Self::last_page_offset(count, per_page))
    }

    /// Cut the page starting at `offset` out of `items`
    ///
    /// An offset past the end yields the last page rather than an empty one.
    #[must_use]
    pub fn slice<T>(items: &[T], offset: usize, per_page: NonZeroUsize) -> PageSlice<'_, T> {
        let offset = Self::clamp_offset(offset, items.len(), per_page);
        let end = offset.saturating_add(per_page.get()).min(items.len());
        PageSlice {
            visible: &items[offset.min(end)..end],
            offset,
            page_index: offset / per_page.get(),
            total_pages: Self::total_pages(items.len(), per_page),
        }
    }
}

/// Pagination and search state of the directory being viewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    offset: usize,
    per_page: NonZeroUsize,
    search_term: Option<String>,
}

impl PageState {
    /// First page, no filter
    #[inline]
    #[must_use]
    pub fn new(per_page: NonZeroUsize) -> Self {
        Self {
            offset: 0,
            per_page,
            search_term: None,
        }
    }

    /// Current offset
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Page size
    #[inline]
    #[must_use]
    pub fn per_page(&self) -> NonZeroUsize {
        self.per_page
    }

    /// Active search term
    #[inline]
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    /// 0-based page index of the current offset
    #[inline]
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.offset / self.per_page.get()
    }

    /// Back to first page with no filter
    pub fn reset(&mut self) {
        self.offset = 0;
        self.search_term = None;
    }

    /// Replace the search term and return to the first page
    ///
    /// An empty term clears the filter.
    pub fn set_search(&mut self, term: Option<String>) {
        self.search_term = term.filter(|t| !t.is_empty());
        self.offset = 0;
    }

    /// Jump to `page_index`, clamped against `count` filtered entries
    pub fn set_page(&mut self, page_index: usize, count: usize) {
        let offset = page_index.saturating_mul(self.per_page.get());
        self.offset = PageWindow::clamp_offset(offset, count, self.per_page);
    }

    /// Re-clamp after the filtered count changed
    pub fn reclamp(&mut self, count: usize) {
        self.offset = PageWindow::clamp_offset(self.offset, count, self.per_page);
    }
}
