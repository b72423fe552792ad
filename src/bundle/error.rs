//! Error types for bundle naming values.

use thiserror::Error;

/// Errors arising from invalid version strings or project names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The version string contains a character that cannot be spliced into
    /// the ruleset document or an archive filename.
    #[error("invalid output version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The project name is empty or contains a path separator.
    #[error("invalid project name \"{value}\": {reason}")]
    InvalidProjectName {
        /// The rejected project name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`NamingError`].
pub type Result<T> = std::result::Result<T, NamingError>;
