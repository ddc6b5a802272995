//! Dead-links report artifact and run summary output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::catalog::Category;
use crate::checker::{CheckReport, ProbeResult};

/// One dead link, carrying enough context for human review.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeadEntry {
    pub name: String,
    pub url: String,
    /// Status code when the server answered; null for probe failures.
    pub status: Option<u16>,
    pub error: Option<String>,
    pub language: String,
    pub country: String,
}

/// Serialized report: dead entries partitioned by catalog category.
#[derive(Debug, Clone, Serialize)]
pub struct DeadLinksReport {
    pub generated_at: String,
    pub newspapers: Vec<DeadEntry>,
    pub magazines: Vec<DeadEntry>,
}

/// Build the report artifact from a checking run.
pub fn build_report(check: &CheckReport) -> DeadLinksReport {
    let mut report = DeadLinksReport {
        generated_at: Utc::now().to_rfc3339(),
        newspapers: Vec::new(),
        magazines: Vec::new(),
    };
    for result in &check.dead {
        let entry = dead_entry(result);
        match result.record.category {
            Category::Newspapers => report.newspapers.push(entry),
            Category::Magazines => report.magazines.push(entry),
        }
    }
    report
}

fn dead_entry(result: &ProbeResult) -> DeadEntry {
    DeadEntry {
        name: result.record.name.clone(),
        url: result.record.url.clone().unwrap_or_default(),
        status: result.status,
        error: result.error.clone(),
        language: result.record.language.clone(),
        country: result.record.country.clone(),
    }
}

/// Write the report as pretty-printed JSON (temp file + rename).
pub fn write_report(path: &Path, report: &DeadLinksReport) -> Result<()> {
    let mut payload = serde_json::to_string_pretty(report).context("serialize report")?;
    payload.push('\n');

    let parent = path
        .parent()
        .with_context(|| format!("report path missing parent {}", path.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("report path missing file name {}", path.display()))?;
    let tmp_path = parent.join(format!("{}.tmp", file_name.to_string_lossy()));
    fs::write(&tmp_path, payload)
        .with_context(|| format!("write temp report {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

/// Print per-category counts and each dead entry.
pub fn print_summary(check: &CheckReport) {
    for category in [Category::Newspapers, Category::Magazines] {
        let working = count(&check.working, category);
        let dead = count(&check.dead, category);
        let skipped = check
            .skipped
            .iter()
            .filter(|record| record.category == category)
            .count();
        println!(
            "summary: {} working={} dead={} skipped={}",
            label(category),
            working,
            dead,
            skipped
        );
    }
    for result in &check.dead {
        let detail = match (result.status, &result.error) {
            (Some(status), _) => format!("status {status}"),
            (None, Some(error)) => error.clone(),
            (None, None) => "unknown".to_string(),
        };
        println!(
            "dead: {} ({}/{}) {} [{}]",
            result.record.name,
            result.record.language,
            result.record.country,
            result.record.url.as_deref().unwrap_or(""),
            detail
        );
    }
}

fn count(results: &[ProbeResult], category: Category) -> usize {
    results
        .iter()
        .filter(|result| result.record.category == category)
        .count()
}

fn label(category: Category) -> &'static str {
    match category {
        Category::Newspapers => "newspapers",
        Category::Magazines => "magazines",
    }
}
