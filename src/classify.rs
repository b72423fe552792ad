//! File classification.
//!
//! Precedence is fixed: `both` is checked first, then `client_only`, then
//! `server_only`; the first category that matches decides. Exclusion
//! expressions only ever narrow the `both` category, and they do so per
//! bundle, so a shared file can end up in either bundle, both, or neither.
//! Files matching no category are dropped without error.

use crate::ruleset::Ruleset;
use camino::{Utf8Path, Utf8PathBuf};

/// A file discovered during the walk, relative to the source root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    relative: Utf8PathBuf,
}

impl FileRecord {
    /// Create a record from a relative path using `/` separators.
    #[must_use]
    pub fn new(relative: impl Into<Utf8PathBuf>) -> Self {
        Self {
            relative: relative.into(),
        }
    }

    /// The path relative to the source root.
    #[must_use]
    pub fn relative(&self) -> &Utf8Path {
        &self.relative
    }

    /// The final path component.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.relative.file_name().unwrap_or_else(|| self.relative.as_str())
    }
}

/// The rule category that claimed a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Matched `both`; subject to per-bundle exclusions.
    Shared,
    /// Matched `client_only`.
    ClientOnly,
    /// Matched `server_only`.
    ServerOnly,
    /// Matched nothing.
    Dropped,
}

/// Where a classified file goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The category that matched.
    pub category: Category,
    /// Whether the file belongs in the client bundle.
    pub client: bool,
    /// Whether the file belongs in the server bundle.
    pub server: bool,
}

impl Placement {
    const fn new(category: Category, client: bool, server: bool) -> Self {
        Self {
            category,
            client,
            server,
        }
    }

    /// Return `true` when the file lands in at least one bundle.
    #[must_use]
    pub const fn is_packaged(&self) -> bool {
        self.client || self.server
    }
}

/// Classify `record` against `ruleset`.
///
/// # Examples
///
/// ```
/// use modpack_packager::bundle::output_version::OutputVersion;
/// use modpack_packager::classify::{Category, FileRecord, classify};
/// use modpack_packager::ruleset::Ruleset;
///
/// let ruleset = Ruleset::from_json_str(
///     r#"{"both": ["mods/"], "server_exclude": ["-client\\.jar$"]}"#,
///     &OutputVersion::unversioned(),
/// )
/// .expect("valid ruleset");
///
/// let placement = classify(&ruleset, &FileRecord::new("mods/hud-client.jar"));
/// assert_eq!(placement.category, Category::Shared);
/// assert!(placement.client);
/// assert!(!placement.server);
/// ```
#[must_use]
pub fn classify(ruleset: &Ruleset, record: &FileRecord) -> Placement {
    let rel_path = record.relative().as_str();
    let basename = record.basename();

    if ruleset.both().matches(rel_path, basename) {
        let client = !ruleset.client_exclude().is_match(rel_path);
        let server = !ruleset.server_exclude().is_match(rel_path);
        return Placement::new(Category::Shared, client, server);
    }
    if ruleset.client_only().matches(rel_path, basename) {
        return Placement::new(Category::ClientOnly, true, false);
    }
    if ruleset.server_only().matches(rel_path, basename) {
        return Placement::new(Category::ServerOnly, false, true);
    }
    Placement::new(Category::Dropped, false, false)
}
