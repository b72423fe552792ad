//! Output archive naming.
//!
//! Bundles are named `<project>-<version>client.zip` and
//! `<project>-<version>server.zip`. The version is glued directly onto the
//! kind suffix, so an unversioned run produces `blightfall-client.zip`.

use super::archive::ArchiveKind;
use super::error::{NamingError, Result};
use super::output_version::OutputVersion;
use std::fmt;

/// Project name used when none is configured.
pub const DEFAULT_PROJECT_NAME: &str = "blightfall";

/// The fixed file extension for bundle archives.
const BUNDLE_EXTENSION: &str = ".zip";

/// The stem shared by a pair of client and server bundle filenames.
///
/// # Examples
///
/// ```
/// use modpack_packager::bundle::naming::BundleName;
/// use modpack_packager::bundle::output_version::OutputVersion;
///
/// let version = OutputVersion::try_from("1.2.3").expect("valid version");
/// let name = BundleName::new("blightfall", version).expect("valid name");
/// assert_eq!(name.client_filename(), "blightfall-1.2.3client.zip");
/// assert_eq!(name.server_filename(), "blightfall-1.2.3server.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleName {
    project: String,
    version: OutputVersion,
}

impl BundleName {
    /// Create a bundle name from a project name and validated version.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::InvalidProjectName`] if `project` is empty or
    /// contains a path separator.
    pub fn new(project: &str, version: OutputVersion) -> Result<Self> {
        if project.trim().is_empty() {
            return Err(NamingError::InvalidProjectName {
                value: project.to_owned(),
                reason: "project name must not be empty".to_owned(),
            });
        }
        if project.contains(['/', '\\']) {
            return Err(NamingError::InvalidProjectName {
                value: project.to_owned(),
                reason: "project name must not contain a path separator".to_owned(),
            });
        }
        Ok(Self {
            project: project.to_owned(),
            version,
        })
    }

    /// Return the project component.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Return the version component.
    #[must_use]
    pub const fn version(&self) -> &OutputVersion {
        &self.version
    }

    /// Return the archive filename for the given bundle kind.
    #[must_use]
    pub fn filename(&self, kind: ArchiveKind) -> String {
        format!(
            "{}-{}{}{BUNDLE_EXTENSION}",
            self.project,
            self.version,
            kind.suffix()
        )
    }

    /// Return the client archive filename.
    #[must_use]
    pub fn client_filename(&self) -> String {
        self.filename(ArchiveKind::Client)
    }

    /// Return the server archive filename.
    #[must_use]
    pub fn server_filename(&self) -> String {
        self.filename(ArchiveKind::Server)
    }
}

impl fmt::Display for BundleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project, self.version)
    }
}
