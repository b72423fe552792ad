//! Error types for the packaging pipeline.
//!
//! Every failure is fatal for the run: the packager never produces a
//! partial bundle on purpose, so callers only need to report the error and
//! exit. Variants carry the path involved wherever one exists.

use crate::bundle::error::NamingError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the client and server bundles.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The ruleset document could not be read from disk.
    #[error("failed to read ruleset {path}")]
    RulesetRead {
        /// Path of the ruleset document.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The ruleset document is not valid JSON or has an unexpected shape.
    #[error("invalid ruleset {origin}")]
    RulesetParse {
        /// Where the document came from (a path, or `<inline>`).
        origin: String,
        /// The underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// An exclusion pattern is not a valid regular expression.
    #[error("invalid {key} pattern \"{pattern}\"")]
    InvalidPattern {
        /// The ruleset key the pattern belongs to.
        key: &'static str,
        /// The rejected pattern text.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The source tree could not be traversed.
    #[error("failed to walk source tree")]
    Walk(#[from] walkdir::Error),

    /// A discovered path is not valid UTF-8 and cannot become an entry name.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    /// A file selected for a bundle could not be read.
    #[error("failed to read source file {path}")]
    SourceRead {
        /// Path of the unreadable file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A substituted copy could not be written to the temporary directory.
    #[error("failed to write substituted copy {path}")]
    SubstitutionWrite {
        /// Destination path of the rewritten copy.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The zip writer rejected an entry or failed to finalise the archive.
    #[error("failed to write archive {path}")]
    Archive {
        /// Path of the archive being written.
        path: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// A version or bundle name failed validation.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// Any other I/O operation failed (output directory, temp directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
