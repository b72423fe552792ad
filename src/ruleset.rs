//! Ruleset loading and pattern types.
//!
//! The ruleset lives in a JSON document next to the tool (`config.json` by
//! default). Before the document is parsed, every literal
//! `{OUTPUT_VERSION}` is replaced with the run's version string; doing the
//! replacement on the raw text lets version tokens appear anywhere, including
//! inside substitution values, without a second templating pass.
//!
//! A [`Ruleset`] is an immutable value. Nothing in the crate keeps a global
//! copy, so tests build as many rulesets as they like from
//! [`RulesetDocument`] values or inline JSON.

use crate::bundle::output_version::{OutputVersion, VERSION_PLACEHOLDER};
use crate::error::{PackagerError, Result};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Placeholder token to replacement value, applied in document order.
pub type TokenMap = IndexMap<String, String>;

/// The raw ruleset document as written on disk.
///
/// Every key is optional and defaults to empty; unknown keys are rejected
/// so that typos surface as errors instead of silently dropped rules.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RulesetDocument {
    /// Path prefixes or basenames packaged into both bundles.
    pub both: Vec<String>,
    /// Path prefixes or basenames packaged into the client bundle only.
    pub client_only: Vec<String>,
    /// Path prefixes or basenames packaged into the server bundle only.
    pub server_only: Vec<String>,
    /// Regular expressions removing shared files from the client bundle.
    pub client_exclude: Vec<String>,
    /// Regular expressions removing shared files from the server bundle.
    pub server_exclude: Vec<String>,
    /// Basename to placeholder map for files rewritten before archiving.
    pub to_format: IndexMap<String, TokenMap>,
    /// Leading path segment renames applied to archive entry names.
    pub rename_map: IndexMap<String, String>,
    /// Basenames stored at the root of the client bundle.
    pub toplevel_client_files: Vec<String>,
}

/// A set of path-prefix or exact-basename patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternSet(Vec<String>);

impl PatternSet {
    /// Create a pattern set from raw pattern strings.
    #[must_use]
    pub const fn new(patterns: Vec<String>) -> Self {
        Self(patterns)
    }

    /// Return `true` when `rel_path` starts with a pattern or `basename`
    /// equals one.
    ///
    /// # Examples
    ///
    /// ```
    /// use modpack_packager::ruleset::PatternSet;
    ///
    /// let set = PatternSet::new(vec!["mods/".to_owned(), "options.txt".to_owned()]);
    /// assert!(set.matches("mods/jei.jar", "jei.jar"));
    /// assert!(set.matches("options.txt", "options.txt"));
    /// assert!(!set.matches("config/mods/a.cfg", "a.cfg"));
    /// ```
    #[must_use]
    pub fn matches(&self, rel_path: &str, basename: &str) -> bool {
        self.0
            .iter()
            .any(|pattern| rel_path.starts_with(pattern.as_str()) || basename == pattern)
    }

    /// Return `true` when `name` is listed verbatim.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|pattern| pattern == name)
    }

    /// Return the patterns in document order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.0
    }

    fn extend(&mut self, extra: &[String]) {
        self.0.extend_from_slice(extra);
    }
}

/// A set of unanchored regular expressions matched against relative paths.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet(Vec<Regex>);

impl ExclusionSet {
    /// Compile the given patterns, reporting the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidPattern`] naming `key` and the
    /// pattern that failed to compile.
    pub fn compile(key: &'static str, patterns: &[String]) -> Result<Self> {
        patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| PackagerError::InvalidPattern {
                    key,
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Return `true` when any expression matches somewhere in `rel_path`.
    #[must_use]
    pub fn is_match(&self, rel_path: &str) -> bool {
        self.0.iter().any(|regex| regex.is_match(rel_path))
    }
}

/// Ordered leading-segment renames for archive entry names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameMap(IndexMap<String, String>);

impl RenameMap {
    /// Create a rename map from `(old, new)` pairs kept in insertion order.
    #[must_use]
    pub const fn new(renames: IndexMap<String, String>) -> Self {
        Self(renames)
    }

    /// Rename the leading segment of `name`.
    ///
    /// Only the first key `old` for which `name` starts with `old/` applies,
    /// and only that leading occurrence is rewritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexmap::IndexMap;
    /// use modpack_packager::ruleset::RenameMap;
    ///
    /// let map = RenameMap::new(IndexMap::from([("flans".to_owned(), "world".to_owned())]));
    /// assert_eq!(map.apply("flans/worldname/x.txt"), "world/worldname/x.txt");
    /// assert_eq!(map.apply("flansmod/x.txt"), "flansmod/x.txt");
    /// ```
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        self.0
            .iter()
            .find_map(|(old, new)| {
                name.strip_prefix(old.as_str())
                    .and_then(|rest| rest.strip_prefix('/'))
                    .map(|rest| format!("{new}/{rest}"))
            })
            .unwrap_or_else(|| name.to_owned())
    }
}

/// The compiled classification and archive-naming rules for one run.
#[derive(Clone, Debug, Default)]
pub struct Ruleset {
    both: PatternSet,
    client_only: PatternSet,
    server_only: PatternSet,
    client_exclude: ExclusionSet,
    server_exclude: ExclusionSet,
    substitutions: IndexMap<String, TokenMap>,
    rename_map: RenameMap,
    toplevel_client_files: PatternSet,
}

impl Ruleset {
    /// Read, interpolate, and compile the ruleset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::RulesetRead`] if the file cannot be read,
    /// [`PackagerError::RulesetParse`] if it is not a valid document, or
    /// [`PackagerError::InvalidPattern`] for a bad exclusion expression.
    pub fn load(path: &Path, version: &OutputVersion) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PackagerError::RulesetRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded ruleset from {} ({} bytes)", path.display(), raw.len());
        parse_document(&raw, version, &path.display().to_string())
    }

    /// Interpolate and compile a ruleset held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::RulesetParse`] or
    /// [`PackagerError::InvalidPattern`] as for [`Self::load`].
    pub fn from_json_str(raw: &str, version: &OutputVersion) -> Result<Self> {
        parse_document(raw, version, "<inline>")
    }

    /// Patterns packaged into both bundles.
    #[must_use]
    pub const fn both(&self) -> &PatternSet {
        &self.both
    }

    /// Patterns packaged into the client bundle only, including the
    /// top-level passthrough basenames.
    #[must_use]
    pub const fn client_only(&self) -> &PatternSet {
        &self.client_only
    }

    /// Patterns packaged into the server bundle only.
    #[must_use]
    pub const fn server_only(&self) -> &PatternSet {
        &self.server_only
    }

    /// Expressions removing shared files from the client bundle.
    #[must_use]
    pub const fn client_exclude(&self) -> &ExclusionSet {
        &self.client_exclude
    }

    /// Expressions removing shared files from the server bundle.
    #[must_use]
    pub const fn server_exclude(&self) -> &ExclusionSet {
        &self.server_exclude
    }

    /// Placeholder tokens for `basename`, if the file is rewritten.
    #[must_use]
    pub fn tokens_for(&self, basename: &str) -> Option<&TokenMap> {
        self.substitutions.get(basename)
    }

    /// The archive entry rename map.
    #[must_use]
    pub const fn rename_map(&self) -> &RenameMap {
        &self.rename_map
    }

    /// Return `true` when `basename` sits at the client bundle root.
    #[must_use]
    pub fn is_toplevel_client_file(&self, basename: &str) -> bool {
        self.toplevel_client_files.contains(basename)
    }
}

impl TryFrom<RulesetDocument> for Ruleset {
    type Error = PackagerError;

    fn try_from(document: RulesetDocument) -> Result<Self> {
        let client_exclude = ExclusionSet::compile("client_exclude", &document.client_exclude)?;
        let server_exclude = ExclusionSet::compile("server_exclude", &document.server_exclude)?;

        // Passthrough files are client files even when the document does not
        // list them under `client_only`.
        let mut client_only = PatternSet::new(document.client_only);
        client_only.extend(&document.toplevel_client_files);

        Ok(Self {
            both: PatternSet::new(document.both),
            client_only,
            server_only: PatternSet::new(document.server_only),
            client_exclude,
            server_exclude,
            substitutions: document.to_format,
            rename_map: RenameMap::new(document.rename_map),
            toplevel_client_files: PatternSet::new(document.toplevel_client_files),
        })
    }
}

/// Replace every `{OUTPUT_VERSION}` in the raw document text.
#[must_use]
pub fn interpolate_version(raw: &str, version: &OutputVersion) -> String {
    raw.replace(VERSION_PLACEHOLDER, version.as_str())
}

fn parse_document(raw: &str, version: &OutputVersion, origin: &str) -> Result<Ruleset> {
    let interpolated = interpolate_version(raw, version);
    let document: RulesetDocument =
        serde_json::from_str(&interpolated).map_err(|source| PackagerError::RulesetParse {
            origin: origin.to_owned(),
            source,
        })?;
    Ruleset::try_from(document)
}

#[cfg(test)]
#[path = "ruleset_tests.rs"]
mod tests;
