//! Error types for TOC navigation
//!
//! Provides error handling for:
//! - Rejected descents into missing or non-directory entries
//! - Directory fetch failures reported by the fetch collaborator

use crate::path::DirPath;

/// Error reported alongside a view after a navigation operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TocError {
    /// Child is not a subdirectory of the current listing
    #[error("cannot descend into {name:?} from {path}")]
    InvalidDescent {
        /// Requested child name
        name: String,
        /// Directory the descent was attempted from
        path: DirPath,
    },

    /// Fetch collaborator failed
    #[error("fetch failed: {0}")]
    Network(#[from] FetchError),
}

impl TocError {
    /// Check if repeating the operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(inner) if inner.is_retryable())
    }
}

/// Directory fetch errors
///
/// Cloneable so one in-flight result can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failed (timeout, connection, CORS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response
    #[error("http status {0}")]
    Status(u16),

    /// Directory does not exist
    #[error("directory not found: {0}")]
    NotFound(DirPath),

    /// Response could not be turned into a listing
    #[error("invalid listing: {0}")]
    InvalidListing(String),

    /// Local I/O failure
    #[error("i/o error: {0}")]
    Io(String),
}

impl FetchError {
    /// Check if retrying the fetch may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Io(_) => true,
            Self::Status(status) => *status >= 500 || *status == 429,
            Self::NotFound(_) | Self::InvalidListing(_) => false,
        }
    }
}
