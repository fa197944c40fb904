//! Navigator configuration
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! per_page = 7
//! cache_capacity = 128
//! root_path = "/datasets"
//! ```

use crate::path::DirPath;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(v) => v,
        None => panic!("value must be non-zero"),
    }
}

/// Default number of cached directory listings
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = non_zero(64);

/// Dashboard tables with their own page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetView {
    /// Recently uploaded runs
    NewRuns,
    /// Runs the user saved
    Saved,
    /// Runs close to server-side deletion
    Expiring,
}

impl DatasetView {
    /// Every view
    pub const ALL: [Self; 3] = [Self::NewRuns, Self::Saved, Self::Expiring];

    /// Rows per page for this view
    #[inline]
    #[must_use]
    pub const fn per_page(self) -> NonZeroUsize {
        match self {
            Self::NewRuns => non_zero(5),
            Self::Saved | Self::Expiring => non_zero(7),
        }
    }

    /// Smallest page size across all views
    #[must_use]
    pub fn smallest_per_page() -> NonZeroUsize {
        Self::ALL
            .iter()
            .map(|view| view.per_page())
            .min()
            .unwrap_or(non_zero(5))
    }
}

/// Navigator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Entries per page
    pub per_page: NonZeroUsize,
    /// Maximum number of cached listings
    pub cache_capacity: NonZeroUsize,
    /// Bottom of the navigation stack
    pub root_path: DirPath,
}

impl TocConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_per_page(mut self, per_page: NonZeroUsize) -> Self {
        self.per_page = per_page;
        self
    }

    /// With page size of a dashboard view
    #[inline]
    #[must_use]
    pub fn for_view(self, view: DatasetView) -> Self {
        self.with_per_page(view.per_page())
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With root path
    #[inline]
    #[must_use]
    pub fn with_root_path(mut self, root: DirPath) -> Self {
        self.root_path = root;
        self
    }

    /// Parse TOML; missing keys take their defaults
    ///
    /// # Errors
    /// Returns error on malformed TOML, unknown keys, or zero sizes
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            per_page: DatasetView::smallest_per_page(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            root_path: DirPath::root(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// File is not valid configuration
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_uses_smallest_view_page_size() {
        let config = TocConfig::default();
        assert_eq!(config.per_page.get(), 5);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(config.root_path.is_root());
    }

    #[test]
    fn view_page_sizes() {
        assert_eq!(DatasetView::NewRuns.per_page().get(), 5);
        assert_eq!(DatasetView::Saved.per_page().get(), 7);
        assert_eq!(DatasetView::Expiring.per_page().get(), 7);
        assert_eq!(TocConfig::new().for_view(DatasetView::Saved).per_page.get(), 7);
    }

    #[test]
    fn parse_partial_toml() {
        let config = TocConfig::from_toml_str("per_page = 7\nroot_path = \"/datasets\"").unwrap();
        assert_eq!(config.per_page.get(), 7);
        assert_eq!(config.root_path.to_string(), "/datasets");
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn parse_rejects_zero() {
        assert!(TocConfig::from_toml_str("per_page = 0").is_err());
        assert!(TocConfig::from_toml_str("cache_capacity = 0").is_err());
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        assert!(TocConfig::from_toml_str("rows = 3").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_capacity = 3").unwrap();
        let config = TocConfig::load(file.path()).unwrap();
        assert_eq!(config.cache_capacity.get(), 3);
    }

    #[test]
    fn load_missing_file() {
        let result = TocConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
