//! Bundle naming and archive writing.
//!
//! # Sub-modules
//!
//! - [`archive`] - Zip creation and archive entry naming rules.
//! - [`error`] - Validation errors for version strings and bundle names.
//! - [`naming`] - Output archive filenames (`BundleName`).
//! - [`output_version`] - Version string newtype (`OutputVersion`).

pub mod archive;
pub mod error;
pub mod naming;
pub mod output_version;
