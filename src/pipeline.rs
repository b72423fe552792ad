//! Packaging pipeline orchestration.
//!
//! Runs the phases in order: collect manifests (rewriting substituted files
//! into a run-scoped temporary directory), write the client archive, then
//! the server archive. The temporary directory is removed when the run
//! returns, whether it succeeded or not.

use crate::bundle::archive::{ArchiveKind, archive_entries, write_archive};
use crate::bundle::naming::BundleName;
use crate::collect::{SubstitutionMode, collect_manifests};
use crate::error::Result;
use crate::manifest::{Manifest, Manifests};
use crate::ruleset::Ruleset;
use crate::substitute::Substitutor;
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Inputs for [`package_bundles`] and [`plan_bundles`].
#[derive(Debug)]
pub struct PackageParams<'a> {
    /// Root of the tree to package.
    pub source_root: PathBuf,
    /// Directory the archives are written to; created if absent.
    pub output_dir: PathBuf,
    /// Classification and naming rules.
    pub ruleset: &'a Ruleset,
    /// Stem of the archive filenames.
    pub bundle_name: BundleName,
    /// Directory the run's temporary directory is created in; the system
    /// temporary directory when `None`.
    pub scratch_parent: Option<PathBuf>,
}

/// One archive produced by [`package_bundles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    /// Path of the written archive.
    pub archive_path: PathBuf,
    /// Number of entries in the archive.
    pub entries: usize,
}

/// Output produced by [`package_bundles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutput {
    /// The client bundle.
    pub client: BundleOutput,
    /// The server bundle.
    pub server: BundleOutput,
}

/// A dry-run view of the bundles [`package_bundles`] would write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Path the client archive would be written to.
    pub client_archive: PathBuf,
    /// Path the server archive would be written to.
    pub server_archive: PathBuf,
    /// Client entry names in archive order.
    pub client_entries: Vec<String>,
    /// Server entry names in archive order.
    pub server_entries: Vec<String>,
}

/// Walk the source tree and write both bundles.
///
/// Progress lines for each phase are written to `progress`.
///
/// # Errors
///
/// Returns any error from the walk, substitution, or archive writing. No
/// attempt is made to remove an archive that was partly written.
pub fn package_bundles(
    params: &PackageParams<'_>,
    progress: &mut dyn Write,
) -> Result<PackageOutput> {
    fs::create_dir_all(&params.output_dir)?;
    let (source_root, output_dir) = resolve_dirs(params)?;

    let scratch = match &params.scratch_parent {
        Some(parent) => TempDir::new_in(parent)?,
        None => TempDir::new()?,
    };
    let substitutor = Substitutor::new(scratch.path());
    let manifests = collect_manifests(
        &source_root,
        params.ruleset,
        SubstitutionMode::Rewrite(&substitutor),
        std::slice::from_ref(&output_dir),
    )?;
    info!(
        "collected {} client and {} server file(s) from {}",
        manifests.client.len(),
        manifests.server.len(),
        source_root.display()
    );

    let client = write_bundle(
        params,
        &output_dir,
        &manifests.client,
        ArchiveKind::Client,
        progress,
    )?;
    let server = write_bundle(
        params,
        &output_dir,
        &manifests.server,
        ArchiveKind::Server,
        progress,
    )?;

    write_line(
        progress,
        format_args!("Client zip created: {}", client.archive_path.display()),
    );
    write_line(
        progress,
        format_args!("Server zip created: {}", server.archive_path.display()),
    );

    scratch.close()?;
    Ok(PackageOutput { client, server })
}

/// Compute what [`package_bundles`] would write, without writing anything.
///
/// Substitution is skipped and the output directory is not created.
///
/// # Errors
///
/// Returns any error from the walk.
pub fn plan_bundles(params: &PackageParams<'_>) -> Result<Plan> {
    let source_root = fs::canonicalize(&params.source_root)?;
    let output_dir = absolute_output_dir(&params.output_dir)?;
    let Manifests { client, server } = collect_manifests(
        &source_root,
        params.ruleset,
        SubstitutionMode::Skip,
        std::slice::from_ref(&output_dir),
    )?;

    let names = |manifest: &Manifest, kind: ArchiveKind| -> Vec<String> {
        archive_entries(manifest, kind, params.ruleset)
            .into_iter()
            .map(|(_, name)| name)
            .collect()
    };
    Ok(Plan {
        client_archive: output_dir.join(params.bundle_name.client_filename()),
        server_archive: output_dir.join(params.bundle_name.server_filename()),
        client_entries: names(&client, ArchiveKind::Client),
        server_entries: names(&server, ArchiveKind::Server),
    })
}

fn write_bundle(
    params: &PackageParams<'_>,
    output_dir: &Path,
    manifest: &Manifest,
    kind: ArchiveKind,
    progress: &mut dyn Write,
) -> Result<BundleOutput> {
    let label = kind.suffix();
    let archive_path = output_dir.join(params.bundle_name.filename(kind));

    write_line(progress, format_args!("starting {label} file creation"));
    let entries = write_archive(&archive_path, manifest, kind, params.ruleset)?;
    write_line(progress, format_args!("done with {label}"));
    info!("wrote {entries} entries to {}", archive_path.display());

    Ok(BundleOutput {
        archive_path,
        entries,
    })
}

/// Canonicalise the source root and (already created) output directory so
/// the walk can recognise the output directory by path.
fn resolve_dirs(params: &PackageParams<'_>) -> Result<(PathBuf, PathBuf)> {
    Ok((
        fs::canonicalize(&params.source_root)?,
        fs::canonicalize(&params.output_dir)?,
    ))
}

/// Resolve the output directory without requiring it to exist.
fn absolute_output_dir(output_dir: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(output_dir) {
        return Ok(resolved);
    }
    Ok(std::path::absolute(output_dir)?)
}

/// Write `message` and a newline to `out`, ignoring write failures.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::output_version::OutputVersion;
    use rstest::{fixture, rstest};

    struct Workspace {
        root: TempDir,
        ruleset: Ruleset,
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Workspace {
        fn source(&self) -> PathBuf {
            self.root.path().join("pack")
        }

        fn output(&self) -> PathBuf {
            self.source().join("output_build").join("output")
        }

        fn scratch_parent(&self) -> PathBuf {
            self.root.path().join("scratch")
        }

        fn scratch_is_empty(&self) -> bool {
            fs::read_dir(self.scratch_parent())
                .expect("read scratch parent")
                .next()
                .is_none()
        }

        fn params(&self) -> PackageParams<'_> {
            PackageParams {
                source_root: self.source(),
                output_dir: self.output(),
                ruleset: &self.ruleset,
                bundle_name: BundleName::new(
                    "blightfall",
                    OutputVersion::try_from("1.2.3").expect("valid version"),
                )
                .expect("valid name"),
                scratch_parent: Some(self.scratch_parent()),
            }
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let root = TempDir::new().expect("temp dir");
        let source = root.path().join("pack");
        for (relative, content) in [
            ("mods/jei.jar", "jar"),
            ("config/pack.cfg", "version={OUTPUT_VERSION}"),
            ("instance.cfg", "name=pack"),
        ] {
            let path = source.join(relative);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(path, content).expect("write");
        }
        fs::create_dir_all(root.path().join("scratch")).expect("mkdir scratch");
        let version = OutputVersion::try_from("1.2.3").expect("valid version");
        let ruleset = Ruleset::from_json_str(
            r#"{
                "both": ["mods/", "config/"],
                "to_format": { "pack.cfg": { "OUTPUT_VERSION": "{OUTPUT_VERSION}" } },
                "toplevel_client_files": ["instance.cfg"]
            }"#,
            &version,
        )
        .expect("valid ruleset");
        Workspace { root, ruleset }
    }

    #[rstest]
    fn package_reports_progress_for_each_phase(workspace: Workspace) {
        let mut progress = Vec::new();
        let output = package_bundles(&workspace.params(), &mut progress).expect("packaged");
        let text = String::from_utf8(progress).expect("utf8 progress");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines.get(..4).expect("four phase lines"),
            [
                "starting client file creation",
                "done with client",
                "starting server file creation",
                "done with server",
            ]
        );
        assert!(text.contains("Client zip created: "));
        assert!(text.contains("Server zip created: "));
        assert_eq!(output.client.entries, 3);
        assert_eq!(output.server.entries, 2);
    }

    #[rstest]
    fn package_creates_output_dir_and_named_archives(workspace: Workspace) {
        let output = package_bundles(&workspace.params(), &mut io_sink()).expect("packaged");
        assert!(workspace.output().is_dir());
        assert_eq!(
            output.client.archive_path.file_name().and_then(|n| n.to_str()),
            Some("blightfall-1.2.3client.zip")
        );
        assert_eq!(
            output.server.archive_path.file_name().and_then(|n| n.to_str()),
            Some("blightfall-1.2.3server.zip")
        );
        assert!(output.client.archive_path.is_file());
        assert!(output.server.archive_path.is_file());
    }

    #[rstest]
    fn plan_writes_nothing(workspace: Workspace) {
        let plan = plan_bundles(&workspace.params()).expect("planned");
        assert!(!workspace.output().exists());
        assert_eq!(
            plan.client_entries,
            ["minecraft/config/pack.cfg", "instance.cfg", "minecraft/mods/jei.jar"]
        );
        assert_eq!(plan.server_entries, ["config/pack.cfg", "mods/jei.jar"]);
        assert!(plan.client_archive.ends_with("blightfall-1.2.3client.zip"));
    }

    #[rstest]
    fn missing_source_root_is_an_error(workspace: Workspace) {
        let mut params = workspace.params();
        params.source_root = workspace.root.path().join("absent");
        assert!(package_bundles(&params, &mut io_sink()).is_err());
    }

    #[rstest]
    fn scratch_directory_is_removed_after_success(workspace: Workspace) {
        let output = package_bundles(&workspace.params(), &mut io_sink()).expect("packaged");
        assert_eq!(output.server.entries, 2);
        assert!(workspace.scratch_is_empty());
    }

    #[rstest]
    fn scratch_directory_is_removed_after_failure(workspace: Workspace) {
        fs::write(
            workspace.source().join("config/pack.cfg"),
            [0xff, 0xfe, 0x00],
        )
        .expect("write non-utf8 file");
        let err = package_bundles(&workspace.params(), &mut io_sink())
            .expect_err("non-utf8 substitution rejected");
        assert!(matches!(err, crate::error::PackagerError::SourceRead { .. }));
        assert!(workspace.scratch_is_empty());
    }

    #[rstest]
    fn progress_write_failures_do_not_abort_packaging(workspace: Workspace) {
        let output = package_bundles(&workspace.params(), &mut BrokenPipe).expect("packaged");
        assert!(output.client.archive_path.is_file());
    }

    fn io_sink() -> std::io::Sink {
        std::io::sink()
    }
}
