//! Rule-driven source migration CLI.
//!
//! Loads a TOML manifest mapping files to named rulesets, applies the
//! rulesets in declaration order, and prints a run summary. Rules are
//! guarded to be idempotent, so re-running a manifest over migrated
//! files is a no-op.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use migrate::manifest::Manifest;
use migrate::report::{print_summary, write_report};
use migrate::runner;
use migrate::transform::Mode;

#[derive(Parser)]
#[command(name = "migrate", version, about = "Rule-driven source migration runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a manifest's rulesets to its files.
    Run {
        /// Path to the migration manifest (TOML).
        #[arg(long)]
        manifest: PathBuf,
        /// Directory entry paths are resolved against.
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Report what would change without writing any file.
        #[arg(long)]
        dry_run: bool,
        /// Also write the full run report as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Load and validate a manifest without touching any file.
    Validate {
        /// Path to the migration manifest (TOML).
        #[arg(long)]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    migrate::logging::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            manifest,
            root,
            dry_run,
            report,
        } => cmd_run(&manifest, &root, dry_run, report.as_deref()),
        Command::Validate { manifest } => cmd_validate(&manifest),
    }
}

fn cmd_run(
    manifest_path: &Path,
    root: &Path,
    dry_run: bool,
    report_path: Option<&Path>,
) -> Result<()> {
    let manifest = Manifest::load(manifest_path).context("load manifest")?;
    let mode = if dry_run { Mode::DryRun } else { Mode::Apply };
    let run_report = runner::run(root, &manifest, mode);
    print_summary(&run_report);
    if let Some(path) = report_path {
        write_report(path, &run_report).context("write run report")?;
    }
    Ok(())
}

fn cmd_validate(manifest_path: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path).context("load manifest")?;
    println!("validate: ok entries={}", manifest.entries.len());
    Ok(())
}
