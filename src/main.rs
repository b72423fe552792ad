//! Modpack packager CLI entrypoint.
//!
//! Loads the ruleset, walks the source tree and writes the client and server
//! bundles. Progress goes to stdout; errors go to stderr with a non-zero
//! exit code.

use clap::Parser;
use modpack_packager::bundle::naming::BundleName;
use modpack_packager::bundle::output_version::OutputVersion;
use modpack_packager::cli::Cli;
use modpack_packager::error::{PackagerError, Result};
use modpack_packager::pipeline::{
    PackageParams, Plan, package_bundles, plan_bundles, write_line,
};
use modpack_packager::ruleset::Ruleset;
use std::error::Error;
use std::io::Write;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run(&cli, &mut stdout), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let version = OutputVersion::try_from(cli.version.as_deref().unwrap_or_default())?;
    let bundle_name = BundleName::new(&cli.name, version.clone())?;
    let ruleset = Ruleset::load(&cli.config, &version)?;

    let params = PackageParams {
        source_root: cli.source_dir.clone(),
        output_dir: cli.output_dir.clone(),
        ruleset: &ruleset,
        bundle_name,
        scratch_parent: None,
    };

    if cli.dry_run {
        let plan = plan_bundles(&params)?;
        print_plan(&plan, stdout);
        return Ok(());
    }

    if cli.quiet {
        package_bundles(&params, &mut std::io::sink())?;
    } else {
        package_bundles(&params, stdout)?;
    }
    Ok(())
}

fn print_plan(plan: &Plan, stdout: &mut dyn Write) {
    for (archive, entries) in [
        (&plan.client_archive, &plan.client_entries),
        (&plan.server_archive, &plan.server_entries),
    ] {
        write_line(
            stdout,
            format_args!("{} ({} entries)", archive.display(), entries.len()),
        );
        for entry in entries {
            write_line(stdout, format_args!("  {entry}"));
        }
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format_args!("error: {}", error_chain(&err)));
            1
        }
    }
}

/// Render `err` followed by each of its sources, colon separated.
fn error_chain(err: &PackagerError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
