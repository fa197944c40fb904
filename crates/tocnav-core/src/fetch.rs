//! Fetch collaborator boundary
//!
//! The controller never talks to a transport directly; it asks a [`DirectoryFetcher`] for
//! a listing on cache miss or explicit refresh.

use crate::entry::Entry;
use crate::error::FetchError;
use crate::path::DirPath;
use async_trait::async_trait;

/// Source of directory listings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryFetcher: Send + Sync {
    /// Fetch the ordered entries of `path`
    async fn fetch_directory(&self, path: &DirPath) -> Result<Vec<Entry>, FetchError>;
}
