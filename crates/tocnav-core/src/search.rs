//! Search-space filtering of directory entries

use crate::entry::Entry;

/// Case-insensitive substring filter over entry names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSpaceFilter {
    needle: Option<String>,
}

impl SearchSpaceFilter {
    /// Build filter; an empty or absent term matches everything
    #[must_use]
    pub fn new(term: Option<&str>) -> Self {
        Self {
            needle: term.filter(|t| !t.is_empty()).map(str::to_lowercase),
        }
    }

    /// Check if filter is a pass-through
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.needle.is_none()
    }

    /// Check a single entry
    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => entry.name().to_lowercase().contains(needle.as_str()),
        }
    }

    /// Matching entries in their original relative order
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}
