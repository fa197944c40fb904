//! Directory paths for addressing levels of the browse tree
//!
//! Provides [`DirPath`] for hierarchical addressing of directory listings.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
pub const DELIMITER: char = '/';

/// Path of a directory within the browse tree
///
/// An ordered sequence of segment names. The empty sequence is the root.
///
/// # Examples
/// - `[]` → `/`
/// - `["runs", "fio"]` → `/runs/fio`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DirPath(Vec<String>);

impl DirPath {
    /// Create path from segments
    ///
    /// # Errors
    /// Returns error if any segment is empty or contains [`DELIMITER`]
    pub fn new(segments: Vec<String>) -> Result<Self, PathError> {
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Alias of [`DirPath::is_empty`] that reads better at call sites
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    ///
    /// # Errors
    /// Returns error if `segment` is not a valid segment
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut new = self.clone();
        new.0.push(segment);
        Ok(new)
    }

    /// Check if `other` is exactly one segment below this path
    #[inline]
    #[must_use]
    pub fn is_parent_of(&self, other: &Self) -> bool {
        other.0.len() == self.0.len() + 1 && other.0[..self.0.len()] == self.0[..]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Check that a segment can appear in a [`DirPath`]
///
/// # Errors
/// Returns error if the segment is empty or contains [`DELIMITER`]
pub fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        Err(PathError::EmptySegment)
    } else if segment.contains(DELIMITER) {
        Err(PathError::ContainsDelimiter(segment.to_string()))
    } else {
        Ok(())
    }
}

impl Display for DirPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "{DELIMITER}{segment}")?;
        }
        if self.0.is_empty() {
            write!(f, "{DELIMITER}")?;
        }
        Ok(())
    }
}

impl FromStr for DirPath {
    type Err = PathError;

    /// Parse `/a/b`, `a/b` or `a/b/`; `""` and `/` are root
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_matches(DELIMITER);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let segments = trimmed
            .split(DELIMITER)
            .map(|seg| validate_segment(seg).map(|()| seg.to_string()))
            .collect::<Result<_, _>>()?;
        Ok(Self(segments))
    }
}

impl TryFrom<String> for DirPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DirPath> for String {
    fn from(path: DirPath) -> Self {
        path.to_string()
    }
}

/// Errors related to directory paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment contains the path delimiter
    #[error("segment {0:?} contains the path delimiter")]
    ContainsDelimiter(String),
}
