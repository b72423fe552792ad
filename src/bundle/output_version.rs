//! Output version newtype.
//!
//! The version string is spliced verbatim into the JSON ruleset document
//! (replacing `{OUTPUT_VERSION}`) and into archive filenames, so it must not
//! contain characters that would break either. An empty version is valid
//! and is what the packager uses when no version argument is given.

use super::error::{NamingError, Result};
use std::fmt;

/// The placeholder token replaced by the version string.
pub const VERSION_PLACEHOLDER: &str = "{OUTPUT_VERSION}";

/// A validated version string for a packaging run.
///
/// # Examples
///
/// ```
/// use modpack_packager::bundle::output_version::OutputVersion;
///
/// let version = OutputVersion::try_from("1.2.3").expect("valid version");
/// assert_eq!(version.as_str(), "1.2.3");
/// assert!(OutputVersion::try_from("1\"2").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OutputVersion(String);

impl OutputVersion {
    /// Return the empty version used when no argument is supplied.
    #[must_use]
    pub const fn unversioned() -> Self {
        Self(String::new())
    }

    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `true` when no version was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&str> for OutputVersion {
    type Error = NamingError;

    fn try_from(value: &str) -> Result<Self> {
        validate_version(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for OutputVersion {
    type Error = NamingError;

    fn try_from(value: String) -> Result<Self> {
        validate_version(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for OutputVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_version(value: &str) -> Result<()> {
    let reject = |reason: String| {
        Err(NamingError::InvalidVersion {
            value: value.to_owned(),
            reason,
        })
    };
    if let Some(bad) = value.chars().find(|c| c.is_control()) {
        return reject(format!("control character {bad:?}"));
    }
    if let Some(bad) = value.chars().find(|c| matches!(c, '"' | '\\' | '/')) {
        return reject(format!("character '{bad}' is not allowed"));
    }
    Ok(())
}
