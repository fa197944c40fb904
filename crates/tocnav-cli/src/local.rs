//! Local filesystem as a listing source

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tocnav_core::{DirPath, DirectoryFetcher, Entry, EntryKind, FetchError};

/// Metadata key holding the file size in bytes
pub const SIZE_KEY: &str = "size";

/// Metadata key holding the RFC 3339 modification time
pub const MODIFIED_KEY: &str = "modified";

/// Lists directories below a base directory
///
/// Directories come first, then files, each group ordered by case-folded name.
#[derive(Debug, Clone)]
pub struct LocalDirectoryFetcher {
    base: PathBuf,
}

impl LocalDirectoryFetcher {
    /// Create fetcher rooted at `base`
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base directory
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Filesystem location of `path`, or `None` if it would leave the base directory
    fn resolve(&self, path: &DirPath) -> Option<PathBuf> {
        let mut resolved = self.base.clone();
        for segment in path.iter() {
            if segment == "." || segment == ".." {
                return None;
            }
            resolved.push(segment);
        }
        Some(resolved)
    }
}

#[async_trait]
impl DirectoryFetcher for LocalDirectoryFetcher {
    async fn fetch_directory(&self, path: &DirPath) -> Result<Vec<Entry>, FetchError> {
        let dir = self
            .resolve(path)
            .ok_or_else(|| FetchError::NotFound(path.clone()))?;
        tracing::debug!(dir = %dir.display(), "reading directory");

        let map_io = |e: io::Error| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound(path.clone()),
            _ => FetchError::Io(format!("{}: {e}", dir.display())),
        };

        let mut read_dir = tokio::fs::read_dir(&dir).await.map_err(map_io)?;
        let mut entries = Vec::new();
        while let Some(item) = read_dir.next_entry().await.map_err(map_io)? {
            let Ok(name) = item.file_name().into_string() else {
                tracing::debug!(path = %item.path().display(), "skipping non-utf8 name");
                continue;
            };
            let metadata = match item.metadata().await {
                Ok(metadata) => metadata,
                Err(error) => {
                    tracing::debug!(%name, %error, "skipping unreadable entry");
                    continue;
                }
            };
            entries.push(to_entry(name, &metadata)?);
        }

        entries.sort_by_cached_key(|entry| {
            (
                entry.kind() != EntryKind::Subdirectory,
                entry.name().to_lowercase(),
            )
        });
        Ok(entries)
    }
}

fn to_entry(name: String, metadata: &std::fs::Metadata) -> Result<Entry, FetchError> {
    let kind = if metadata.is_dir() {
        EntryKind::Subdirectory
    } else {
        EntryKind::File
    };
    let mut entry = Entry::new(name, kind).map_err(|e| FetchError::InvalidListing(e.to_string()))?;
    if kind == EntryKind::File {
        entry = entry.with_metadata(SIZE_KEY, metadata.len());
    }
    if let Ok(modified) = metadata.modified() {
        let modified: DateTime<Utc> = modified.into();
        entry = entry.with_metadata(MODIFIED_KEY, modified.to_rfc3339());
    }
    Ok(entry)
}
