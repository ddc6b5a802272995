//! Per-file transformation: load content, apply rulesets, write back.
//!
//! This is the only transformation component that touches the
//! filesystem. Files are read whole (small source files, not streams)
//! and written back only when the content actually changed, via a
//! temp-file-then-rename so no reader ever observes a half-written
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::manifest::{Entry, Manifest};
use crate::rule::RuleApplication;

/// Whether transformed content is written back or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    DryRun,
}

/// Terminal state of one file after transformation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Content changed and was written back (or would be, in dry-run).
    Transformed,
    /// All rules were no-ops; nothing written.
    Unchanged,
    /// File not found; skipped, never fatal.
    Missing,
    /// Read or write failed; the run continues with the next file.
    Error(String),
}

/// Per-file record of what changed, consumed by the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub changed: bool,
    pub applications: Vec<RuleApplication>,
}

/// Apply an entry's rulesets to its file and report the result.
///
/// Ruleset lookup misses are impossible for a validated manifest; they
/// are reported as file errors rather than panics to keep the
/// per-item isolation contract.
pub fn transform(root: &Path, entry: &Entry, manifest: &Manifest, mode: Mode) -> ChangeReport {
    let path = root.join(&entry.path);
    let original = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "file not found, skipping");
            return report(entry, FileStatus::Missing, false, Vec::new());
        }
        Err(err) => {
            return report(
                entry,
                FileStatus::Error(format!("read {}: {err}", path.display())),
                false,
                Vec::new(),
            );
        }
    };

    let mut current = original.clone();
    let mut applications = Vec::new();
    for name in &entry.rulesets {
        let Some(set) = manifest.ruleset(name) else {
            return report(
                entry,
                FileStatus::Error(format!("unknown ruleset {name:?}")),
                false,
                applications,
            );
        };
        let (next, mut set_applications) = set.apply(&current);
        applications.append(&mut set_applications);
        current = next;
    }

    if current == original {
        debug!(path = %path.display(), "no-op");
        return report(entry, FileStatus::Unchanged, false, applications);
    }

    if mode == Mode::Apply {
        if let Err(err) = write_atomic(&path, &current) {
            return report(entry, FileStatus::Error(format!("{err:#}")), false, applications);
        }
    }
    report(entry, FileStatus::Transformed, true, applications)
}

fn report(
    entry: &Entry,
    status: FileStatus,
    changed: bool,
    applications: Vec<RuleApplication>,
) -> ChangeReport {
    ChangeReport {
        path: entry.path.clone(),
        status,
        changed,
        applications,
    }
}

/// Atomically replace `path` with `contents` (temp file + rename in
/// the same directory).
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("path missing file name {}", path.display()))?;
    let tmp_path = parent.join(format!("{}.tmp", file_name.to_string_lossy()));
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
