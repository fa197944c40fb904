//! Metadata key classification
//!
//! Dataset metadata keys are dotted (`server.tarball-path`), and the dashboard joins them
//! with `*` when it sends key lists to the server. [`MetadataKey`] accepts both forms and
//! exposes named checks for the keys the browser treats specially.

use std::fmt::{self, Display, Formatter};

/// Separator used when several keys are joined into one request value
pub const KEYS_JOIN_BY: char = '*';

/// Separator between segments of a single key
pub const KEY_SEPARATOR: char = '.';

/// Structured metadata key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataKey(Vec<String>);

impl MetadataKey {
    /// Parse a key joined by `.` or `*`
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split([KEY_SEPARATOR, KEYS_JOIN_BY])
                .map(str::to_string)
                .collect(),
        )
    }

    /// Get key segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    fn is(&self, expected: &[&str]) -> bool {
        self.0.len() == expected.len() && self.starts_with(expected)
    }

    fn starts_with(&self, prefix: &[&str]) -> bool {
        self.0.len() >= prefix.len() && self.0.iter().zip(prefix).all(|(a, b)| a == b)
    }

    /// `server.index-map`
    #[must_use]
    pub fn is_index_map(&self) -> bool {
        self.is(&["server", "index-map"])
    }

    /// `server.tarball-path`
    #[must_use]
    pub fn is_tarball_path(&self) -> bool {
        self.is(&["server", "tarball-path"])
    }

    /// `dataset.operations`
    #[must_use]
    pub fn is_operations(&self) -> bool {
        self.is(&["dataset", "operations"])
    }

    /// Anything under `dataset.metalog.iterations`
    #[must_use]
    pub fn is_iterations(&self) -> bool {
        self.starts_with(&["dataset", "metalog", "iterations"])
    }

    /// Anything under `dataset.metalog.tools`
    #[must_use]
    pub fn is_tools(&self) -> bool {
        self.starts_with(&["dataset", "metalog", "tools"])
    }
}

impl Display for MetadataKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Metadata the browser gives special meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataClass {
    /// Map of the dataset's search indices
    IndexMap,
    /// Server-side tarball location
    TarballPath,
    /// Operations allowed on the dataset
    Operations,
    /// Benchmark iteration results
    Iterations,
    /// Collection tool settings
    Tools,
}

impl MetadataClass {
    /// Short label for display
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IndexMap => "index-map",
            Self::TarballPath => "tarball",
            Self::Operations => "operations",
            Self::Iterations => "iterations",
            Self::Tools => "tools",
        }
    }
}

impl Display for MetadataClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl MetadataKey {
    /// Class of this key, `None` for ordinary metadata
    #[must_use]
    pub fn classify(&self) -> Option<MetadataClass> {
        if self.is_index_map() {
            Some(MetadataClass::IndexMap)
        } else if self.is_tarball_path() {
            Some(MetadataClass::TarballPath)
        } else if self.is_operations() {
            Some(MetadataClass::Operations)
        } else if self.is_iterations() {
            Some(MetadataClass::Iterations)
        } else if self.is_tools() {
            Some(MetadataClass::Tools)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators() {
        assert_eq!(
            MetadataKey::parse("server*tarball-path"),
            MetadataKey::parse("server.tarball-path")
        );
    }

    #[test]
    fn exact_keys() {
        assert!(MetadataKey::parse("server.index-map").is_index_map());
        assert!(MetadataKey::parse("server.tarball-path").is_tarball_path());
        assert!(MetadataKey::parse("dataset*operations").is_operations());
        assert!(!MetadataKey::parse("server.tarball-path.extra").is_tarball_path());
        assert!(!MetadataKey::parse("dataset.operations.x").is_operations());
    }

    #[test]
    fn prefix_keys() {
        assert!(MetadataKey::parse("dataset.metalog.iterations").is_iterations());
        assert!(MetadataKey::parse("dataset.metalog.iterations.1-read").is_iterations());
        assert!(MetadataKey::parse("dataset.metalog.tools.sar").is_tools());
        assert!(!MetadataKey::parse("dataset.metalog").is_tools());
    }

    #[test]
    fn classify_keys() {
        assert_eq!(
            MetadataKey::parse("server*index-map").classify(),
            Some(MetadataClass::IndexMap)
        );
        assert_eq!(
            MetadataKey::parse("dataset.metalog.tools.sar").classify(),
            Some(MetadataClass::Tools)
        );
        assert_eq!(MetadataKey::parse("dataset.name").classify(), None);
        assert_eq!(MetadataClass::TarballPath.to_string(), "tarball");
    }
}
