//! Placeholder substitution.
//!
//! [`substitute`] is the pure text transform; [`Substitutor`] is the thin
//! filesystem wrapper that mirrors rewritten files under the run's
//! temporary directory. Tokens that do not occur in a file are left alone,
//! and a `{token}` with no configured value stays in the output verbatim.

use crate::error::{PackagerError, Result};
use crate::ruleset::TokenMap;
use camino::Utf8Path;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Replace every `{token}` in `content` with its value from `tokens`.
///
/// Replacement is plain substring replacement, applied token by token in
/// map order.
///
/// # Examples
///
/// ```
/// use modpack_packager::ruleset::TokenMap;
/// use modpack_packager::substitute::substitute;
///
/// let tokens = TokenMap::from([("OUTPUT_VERSION".to_owned(), "1.2.3".to_owned())]);
/// assert_eq!(substitute("version={OUTPUT_VERSION}", &tokens), "version=1.2.3");
/// ```
#[must_use]
pub fn substitute(content: &str, tokens: &TokenMap) -> String {
    tokens
        .iter()
        .fold(content.to_owned(), |text, (token, value)| {
            text.replace(&format!("{{{token}}}"), value)
        })
}

/// Writes substituted copies of source files under a temporary root.
#[derive(Debug, Clone)]
pub struct Substitutor {
    temp_root: PathBuf,
}

impl Substitutor {
    /// Create a substitutor writing beneath `temp_root`.
    #[must_use]
    pub fn new(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
        }
    }

    /// Rewrite `source_root/relative` and return the path of the copy.
    ///
    /// The copy lives at `temp_root/relative`; parent directories are
    /// created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::SourceRead`] if the source cannot be read
    /// as UTF-8 text, or [`PackagerError::SubstitutionWrite`] if the copy
    /// cannot be written.
    pub fn rewrite(
        &self,
        source_root: &Path,
        relative: &Utf8Path,
        tokens: &TokenMap,
    ) -> Result<PathBuf> {
        let source = source_root.join(relative.as_std_path());
        let content = fs::read_to_string(&source).map_err(|err| PackagerError::SourceRead {
            path: source.clone(),
            source: err,
        })?;

        let target = self.temp_root.join(relative.as_std_path());
        let write_error = |err| PackagerError::SubstitutionWrite {
            path: target.clone(),
            source: err,
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&target, substitute(&content, tokens)).map_err(write_error)?;

        debug!(
            "substituted {} token(s) into {}",
            tokens.len(),
            target.display()
        );
        Ok(target)
    }
}
