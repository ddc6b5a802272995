//! Run summary aggregation and report output.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::transform::{ChangeReport, FileStatus, write_atomic};

/// Applied/attempted counters for one qualified rule name.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RuleStats {
    pub applied: usize,
    pub attempted: usize,
}

/// Aggregate counts for one run. A run always ends with one of these,
/// even when every file was missing or errored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub processed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub missing: usize,
    pub errored: usize,
    pub rule_counts: BTreeMap<String, RuleStats>,
}

/// Full run output: summary plus per-file reports, serializable as a
/// JSON artifact for later review.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: Summary,
    pub files: Vec<ChangeReport>,
}

impl Summary {
    /// Fold one file's change report into the aggregate.
    pub fn record(&mut self, change: &ChangeReport) {
        self.processed += 1;
        match &change.status {
            FileStatus::Transformed => self.changed += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::Missing => self.missing += 1,
            FileStatus::Error(_) => self.errored += 1,
        }
        for application in &change.applications {
            let stats = self.rule_counts.entry(application.rule.clone()).or_default();
            stats.attempted += 1;
            if application.applied {
                stats.applied += 1;
            }
        }
    }
}

/// Print the summary as stable `summary:`-prefixed lines.
pub fn print_summary(report: &RunReport) {
    let summary = &report.summary;
    println!(
        "summary: processed={} changed={} unchanged={} missing={} errored={}",
        summary.processed, summary.changed, summary.unchanged, summary.missing, summary.errored
    );
    for (rule, stats) in &summary.rule_counts {
        println!("summary: rule {} {}/{}", rule, stats.applied, stats.attempted);
    }
    for change in &report.files {
        if let FileStatus::Error(message) = &change.status {
            eprintln!("error: {}: {}", change.path.display(), message);
        }
    }
}

/// Write the full run report as pretty-printed JSON (atomic).
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let mut payload = serde_json::to_string_pretty(report).context("serialize run report")?;
    payload.push('\n');
    write_atomic(path, &payload).with_context(|| format!("write report {}", path.display()))
}
