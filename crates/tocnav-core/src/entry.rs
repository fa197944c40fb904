//! Directory entries and listings

use crate::metadata::{MetadataClass, MetadataKey};
use crate::path::{validate_segment, DirPath, PathError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Opaque per-entry metadata
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Leaf item
    File,
    /// Browsable child directory
    Subdirectory,
}

/// One item within a directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    name: String,
    kind: EntryKind,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    metadata: Metadata,
}

impl Entry {
    /// Create entry
    ///
    /// # Errors
    /// Returns error if `name` is empty or contains the path delimiter
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Result<Self, EntryError> {
        let name = name.into();
        validate_segment(&name).map_err(|source| EntryError::InvalidName {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            kind,
            metadata: Metadata::new(),
        })
    }

    /// Create file entry
    ///
    /// # Errors
    /// See [`Entry::new`]
    #[inline]
    pub fn file(name: impl Into<String>) -> Result<Self, EntryError> {
        Self::new(name, EntryKind::File)
    }

    /// Create subdirectory entry
    ///
    /// # Errors
    /// See [`Entry::new`]
    #[inline]
    pub fn subdirectory(name: impl Into<String>) -> Result<Self, EntryError> {
        Self::new(name, EntryKind::Subdirectory)
    }

    /// Attach a metadata value
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Entry name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Check if entry can be descended into
    #[inline]
    #[must_use]
    pub fn is_subdirectory(&self) -> bool {
        self.kind == EntryKind::Subdirectory
    }

    /// All metadata
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Metadata value by exact key
    #[inline]
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    /// Metadata values the browser gives special meaning, in key order
    pub fn classified_metadata(
        &self,
    ) -> impl Iterator<Item = (MetadataClass, &serde_json::Value)> + '_ {
        self.metadata.iter().filter_map(|(key, value)| {
            MetadataKey::parse(key)
                .classify()
                .map(|class| (class, value))
        })
    }

    /// Distinct metadata classes carried by this entry
    #[must_use]
    pub fn metadata_classes(&self) -> BTreeSet<MetadataClass> {
        self.classified_metadata().map(|(class, _)| class).collect()
    }

    /// Server-side tarball location, if the entry carries one
    #[must_use]
    pub fn tarball_path(&self) -> Option<&str> {
        self.classified_metadata()
            .find(|(class, _)| *class == MetadataClass::TarballPath)
            .and_then(|(_, value)| value.as_str())
    }
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    kind: EntryKind,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<RawEntry> for Entry {
    type Error = EntryError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let mut entry = Entry::new(raw.name, raw.kind)?;
        entry.metadata = raw.metadata;
        Ok(entry)
    }
}

/// Immutable listing of one browsable level
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryNode {
    path: DirPath,
    entries: Vec<Entry>,
    fetched_at: u64,
}

impl DirectoryNode {
    /// Create listing
    ///
    /// # Errors
    /// Returns error if two entries share a name
    pub fn new(path: DirPath, entries: Vec<Entry>, fetched_at: u64) -> Result<Self, EntryError> {
        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(dup) = entries.iter().find(|e| !seen.insert(e.name())) {
            return Err(EntryError::DuplicateName {
                name: dup.name().to_string(),
                path: path.to_string(),
            });
        }
        Ok(Self {
            path,
            entries,
            fetched_at,
        })
    }

    /// Path of this listing
    #[inline]
    #[must_use]
    pub fn path(&self) -> &DirPath {
        &self.path
    }

    /// Entries in listing order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Logical time the listing was stored
    #[inline]
    #[must_use]
    pub fn fetched_at(&self) -> u64 {
        self.fetched_at
    }

    /// Find entry by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name() == name)
    }
}

/// Errors related to entries and listings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// Name is not a valid path segment
    #[error("invalid entry name {name:?}: {source}")]
    InvalidName {
        /// Rejected name
        name: String,
        /// Underlying segment error
        source: PathError,
    },

    /// Two entries in one listing share a name
    #[error("duplicate entry {name:?} in {path}")]
    DuplicateName {
        /// Duplicated name
        name: String,
        /// Listing path
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_rejects_delimiter() {
        let result = Entry::file("a/b");
        assert!(matches!(result, Err(EntryError::InvalidName { .. })));
    }

    #[test]
    fn entry_kind_helpers() {
        assert!(Entry::subdirectory("runs").unwrap().is_subdirectory());
        assert!(!Entry::file("result.csv").unwrap().is_subdirectory());
    }

    #[test]
    fn entry_tarball_path() {
        let entry = Entry::file("fio.tar.xz")
            .unwrap()
            .with_metadata("server.tarball-path", "/srv/archive/fio.tar.xz")
            .with_metadata("dataset.name", "fio");
        assert_eq!(entry.tarball_path(), Some("/srv/archive/fio.tar.xz"));
        assert!(Entry::file("x").unwrap().tarball_path().is_none());
    }

    #[test]
    fn entry_metadata_classes() {
        let entry = Entry::subdirectory("fio")
            .unwrap()
            .with_metadata("dataset.metalog.iterations.1-read", "1")
            .with_metadata("dataset.metalog.tools.sar", "default")
            .with_metadata("dataset.metalog.tools.iostat", "default")
            .with_metadata("dataset.name", "fio");
        let classes: Vec<_> = entry.metadata_classes().into_iter().collect();
        assert_eq!(classes, [MetadataClass::Iterations, MetadataClass::Tools]);
        assert!(Entry::file("x").unwrap().metadata_classes().is_empty());
    }

    #[test]
    fn entry_deserialize_validates_name() {
        let ok: Entry = serde_json::from_str(r#"{"name":"runs","kind":"subdirectory"}"#).unwrap();
        assert!(ok.is_subdirectory());
        assert!(ok.metadata().is_empty());

        let bad = serde_json::from_str::<Entry>(r#"{"name":"a/b","kind":"file"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn node_rejects_duplicates() {
        let entries = vec![Entry::file("a").unwrap(), Entry::file("a").unwrap()];
        let result = DirectoryNode::new(DirPath::root(), entries, 1);
        assert!(matches!(result, Err(EntryError::DuplicateName { .. })));
    }

    #[test]
    fn node_find() {
        let node = DirectoryNode::new(
            DirPath::root(),
            vec![Entry::subdirectory("runs").unwrap()],
            7,
        )
        .unwrap();
        assert_eq!(node.fetched_at(), 7);
        assert!(node.find("runs").is_some());
        assert!(node.find("missing").is_none());
    }
}
