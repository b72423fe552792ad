//! Bundle manifests.
//!
//! A manifest is the set of files destined for one archive. Entries pair the
//! path that will actually be read (the original file, or its substituted
//! copy in the temporary directory) with the file's path relative to the
//! source root, which is what archive entry names are derived from.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One file destined for an archive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManifestEntry {
    relative: Utf8PathBuf,
    source: PathBuf,
}

impl ManifestEntry {
    /// Create an entry reading `source` and named after `relative`.
    #[must_use]
    pub fn new(relative: impl Into<Utf8PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            source: source.into(),
        }
    }

    /// The path relative to the source root, with `/` separators.
    #[must_use]
    pub fn relative(&self) -> &Utf8Path {
        &self.relative
    }

    /// The path on disk the archive writer reads.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The final path component.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.relative.file_name().unwrap_or_else(|| self.relative.as_str())
    }
}

/// The set of entries destined for one archive, ordered by relative path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest(BTreeSet<ManifestEntry>);

impl Manifest {
    /// Create an empty manifest.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add an entry, returning `false` if it was already present.
    pub fn insert(&mut self, entry: ManifestEntry) -> bool {
        self.0.insert(entry)
    }

    /// Iterate over the entries in relative-path order.
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.0.iter()
    }

    /// Return `true` when an entry with this relative path is present.
    #[must_use]
    pub fn contains(&self, relative: &str) -> bool {
        self.0.iter().any(|entry| entry.relative.as_str() == relative)
    }

    /// Return the entry with this relative path, if present.
    #[must_use]
    pub fn get(&self, relative: &str) -> Option<&ManifestEntry> {
        self.0.iter().find(|entry| entry.relative.as_str() == relative)
    }

    /// Return the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when the manifest holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::collections::btree_set::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The client and server manifests produced by one walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifests {
    /// Files destined for the client bundle.
    pub client: Manifest,
    /// Files destined for the server bundle.
    pub server: Manifest,
}
