//! Source tree walk.
//!
//! Walks the source root once, classifies every regular file and records it
//! in the client and/or server manifest. Files flagged for substitution are
//! rewritten into the temporary directory as they are collected, and the
//! manifest entry then points at the rewritten copy.

use crate::classify::{FileRecord, classify};
use crate::error::{PackagerError, Result};
use crate::manifest::{ManifestEntry, Manifests};
use crate::ruleset::Ruleset;
use crate::substitute::Substitutor;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Prefix of top-level directory names that are never packaged.
///
/// This keeps the packager's own directory and previous build artefacts out
/// of the bundles.
pub const OUTPUT_DIR_PREFIX: &str = "output";

/// How substituted files are handled during collection.
#[derive(Debug, Clone, Copy)]
pub enum SubstitutionMode<'a> {
    /// Rewrite flagged files into the substitutor's temporary directory.
    Rewrite(&'a Substitutor),
    /// Leave every entry pointing at its original file.
    Skip,
}

/// Walk `source_root` and build the client and server manifests.
///
/// Directories listed in `skip` are never entered, in addition to top-level
/// directories whose name starts with [`OUTPUT_DIR_PREFIX`]. A symbolic
/// link to a file is collected like a regular file; symbolic links to
/// directories are not followed.
///
/// # Errors
///
/// Returns [`PackagerError::Walk`] if a directory cannot be read,
/// [`PackagerError::NonUtf8Path`] for a path that cannot be named inside an
/// archive, or any error from [`Substitutor::rewrite`].
pub fn collect_manifests(
    source_root: &Path,
    ruleset: &Ruleset,
    substitution: SubstitutionMode<'_>,
    skip: &[PathBuf],
) -> Result<Manifests> {
    let mut manifests = Manifests::default();
    let walker = WalkDir::new(source_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry, skip));

    for entry in walker {
        let entry = entry?;
        if !is_packable_file(&entry) {
            continue;
        }

        let record = FileRecord::new(relative_path(source_root, entry.path())?);
        let placement = classify(ruleset, &record);
        if !placement.is_packaged() {
            debug!("dropped {}", record.relative());
            continue;
        }

        let source = resolve_source(source_root, &record, ruleset, substitution, entry.path())?;
        let manifest_entry = ManifestEntry::new(record.relative(), source);
        debug!(
            "{} -> client={} server={} ({:?})",
            record.relative(),
            placement.client,
            placement.server,
            placement.category
        );
        if placement.client {
            manifests.client.insert(manifest_entry.clone());
        }
        if placement.server {
            manifests.server.insert(manifest_entry);
        }
    }

    Ok(manifests)
}

/// Regular files, and symbolic links whose target is a regular file.
fn is_packable_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn is_skipped_dir(entry: &DirEntry, skip: &[PathBuf]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let top_level_output =
        entry.depth() == 1 && entry.file_name().to_string_lossy().starts_with(OUTPUT_DIR_PREFIX);
    let skipped = top_level_output || skip.iter().any(|dir| dir.as_path() == entry.path());
    if skipped {
        trace!("skipping directory {}", entry.path().display());
    }
    skipped
}

/// Build the `/`-separated path of `path` relative to `source_root`.
fn relative_path(source_root: &Path, path: &Path) -> Result<Utf8PathBuf> {
    let relative = path.strip_prefix(source_root).unwrap_or(path);
    let utf8 = Utf8Path::from_path(relative)
        .ok_or_else(|| PackagerError::NonUtf8Path(path.to_path_buf()))?;
    let joined = utf8
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/");
    Ok(Utf8PathBuf::from(joined))
}

fn resolve_source(
    source_root: &Path,
    record: &FileRecord,
    ruleset: &Ruleset,
    substitution: SubstitutionMode<'_>,
    original: &Path,
) -> Result<PathBuf> {
    match (substitution, ruleset.tokens_for(record.basename())) {
        (SubstitutionMode::Rewrite(substitutor), Some(tokens)) => {
            substitutor.rewrite(source_root, record.relative(), tokens)
        }
        _ => Ok(original.to_path_buf()),
    }
}

#[cfg(test)]
#[path = "collect_tests.rs"]
mod tests;
