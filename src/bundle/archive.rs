//! Zip archive creation for client and server bundles.
//!
//! Entry names are derived from each file's path relative to the source
//! root, so substituted copies never leak their temporary-directory prefix.
//! Client entries are nested under [`CLIENT_CONTENT_DIR`] unless the file is
//! a top-level passthrough; the rename map is applied last, once.

use crate::error::{PackagerError, Result};
use crate::manifest::{Manifest, ManifestEntry};
use crate::ruleset::Ruleset;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Folder that holds the game content inside the client bundle.
pub const CLIENT_CONTENT_DIR: &str = "minecraft";

/// Which bundle an archive is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// The client bundle, imported by a launcher.
    Client,
    /// The dedicated server bundle.
    Server,
}

impl ArchiveKind {
    /// The suffix appended to the bundle stem in the archive filename.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

/// Derive the name `entry` is stored under in an archive of `kind`.
///
/// # Examples
///
/// ```
/// use modpack_packager::bundle::archive::{ArchiveKind, archive_entry_name};
/// use modpack_packager::bundle::output_version::OutputVersion;
/// use modpack_packager::manifest::ManifestEntry;
/// use modpack_packager::ruleset::Ruleset;
///
/// let ruleset = Ruleset::from_json_str(
///     r#"{"toplevel_client_files": ["instance.cfg"]}"#,
///     &OutputVersion::unversioned(),
/// )
/// .expect("valid ruleset");
///
/// let config = ManifestEntry::new("config/a.cfg", "/src/config/a.cfg");
/// let instance = ManifestEntry::new("instance.cfg", "/tmp/run/instance.cfg");
/// assert_eq!(
///     archive_entry_name(&config, ArchiveKind::Client, &ruleset),
///     "minecraft/config/a.cfg"
/// );
/// assert_eq!(
///     archive_entry_name(&instance, ArchiveKind::Client, &ruleset),
///     "instance.cfg"
/// );
/// assert_eq!(
///     archive_entry_name(&config, ArchiveKind::Server, &ruleset),
///     "config/a.cfg"
/// );
/// ```
#[must_use]
pub fn archive_entry_name(entry: &ManifestEntry, kind: ArchiveKind, ruleset: &Ruleset) -> String {
    let relative = entry.relative().as_str();
    let nested = match kind {
        ArchiveKind::Client if !ruleset.is_toplevel_client_file(entry.basename()) => {
            format!("{CLIENT_CONTENT_DIR}/{relative}")
        }
        _ => relative.to_owned(),
    };
    ruleset.rename_map().apply(&nested)
}

/// Build the `(source_path, archive_name)` pairs for `manifest`.
#[must_use]
pub fn archive_entries(
    manifest: &Manifest,
    kind: ArchiveKind,
    ruleset: &Ruleset,
) -> Vec<(PathBuf, String)> {
    manifest
        .iter()
        .map(|entry| {
            (
                entry.source().to_path_buf(),
                archive_entry_name(entry, kind, ruleset),
            )
        })
        .collect()
}

/// Create a deflate-compressed zip at `output_path`.
///
/// Each entry in `files` is a `(source_path, archive_name)` pair. Any
/// unreadable source aborts the whole archive.
///
/// # Errors
///
/// Returns [`PackagerError::SourceRead`] if a source file cannot be opened,
/// or [`PackagerError::Archive`] if the archive cannot be written.
pub fn create_zip(output_path: &Path, files: &[(PathBuf, String)]) -> Result<()> {
    let archive_error = |source: zip::result::ZipError| PackagerError::Archive {
        path: output_path.to_path_buf(),
        source,
    };
    let output_file = fs::File::create(output_path)
        .map_err(|err| archive_error(zip::result::ZipError::Io(err)))?;
    let mut writer = ZipWriter::new(output_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (source_path, archive_name) in files {
        let mut source = fs::File::open(source_path).map_err(|err| PackagerError::SourceRead {
            path: source_path.clone(),
            source: err,
        })?;
        writer
            .start_file(archive_name.as_str(), options)
            .map_err(archive_error)?;
        io::copy(&mut source, &mut writer)
            .map_err(|err| archive_error(zip::result::ZipError::Io(err)))?;
        debug!("added {} as {archive_name}", source_path.display());
    }

    writer.finish().map_err(archive_error)?;
    Ok(())
}

/// Write `manifest` as an archive of `kind` at `output_path`.
///
/// Returns the number of entries written.
///
/// # Errors
///
/// Returns any error from [`create_zip`].
pub fn write_archive(
    output_path: &Path,
    manifest: &Manifest,
    kind: ArchiveKind,
    ruleset: &Ruleset,
) -> Result<usize> {
    let entries = archive_entries(manifest, kind, ruleset);
    create_zip(output_path, &entries)?;
    Ok(entries.len())
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
