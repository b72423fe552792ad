//! Modpack bundle packager.
//!
//! Builds the client and server distribution archives for a modpack source
//! tree. Files are classified by a JSON ruleset, selected files have
//! placeholder tokens rewritten, and the results are written to two zip
//! archives with the bundle naming rules applied.
//!
//! # Modules
//!
//! - [`bundle`] - Archive naming and zip writing
//! - [`classify`] - Rule precedence and per-bundle placement
//! - [`cli`] - Command-line argument definitions
//! - [`collect`] - Source tree walk building the manifests
//! - [`error`] - Error types for the packaging pipeline
//! - [`manifest`] - Per-bundle file sets
//! - [`pipeline`] - Phase orchestration and dry-run planning
//! - [`ruleset`] - Ruleset loading and pattern types
//! - [`substitute`] - Placeholder substitution

pub mod bundle;
pub mod classify;
pub mod cli;
pub mod collect;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod ruleset;
pub mod substitute;
