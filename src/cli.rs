//! CLI argument definitions for the packager.
//!
//! The defaults reproduce the layout the packager is run from: a directory
//! inside the modpack root holding `config.json`, packaging its parent
//! directory and writing bundles into its own `output/` subdirectory.

use crate::bundle::naming::DEFAULT_PROJECT_NAME;
use clap::Parser;
use std::path::PathBuf;

/// Build client and server bundles for a modpack.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "modpack-packager")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build unversioned bundles from the parent directory:\n",
    "    $ modpack-packager\n\n",
    "  Build versioned bundles:\n",
    "    $ modpack-packager 1.2.3\n\n",
    "  List the entries each bundle would contain:\n",
    "    $ modpack-packager 1.2.3 --dry-run\n",
))]
pub struct Cli {
    /// Version string substituted for `{OUTPUT_VERSION}` [default: empty].
    #[arg(id = "output_version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Ruleset document describing how files are classified.
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config: PathBuf,

    /// Root of the tree to package.
    #[arg(long, value_name = "DIR", default_value = "..")]
    pub source_dir: PathBuf,

    /// Directory the bundles are written to.
    #[arg(long, value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Stem of the bundle filenames.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub name: String,

    /// Print the entries each bundle would contain without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,
}
