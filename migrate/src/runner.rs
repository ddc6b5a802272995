//! Migration orchestration over a manifest.
//!
//! Iterates manifest entries in declaration order and aggregates one
//! summary for the run. Per-file failures (missing files, write
//! errors) are isolated: they are recorded in that file's report and
//! the run continues. Only manifest load/validation failures are
//! fatal, and those happen before this module runs.
//!
//! The runner keeps no state across runs. Idempotence comes entirely
//! from rule guards inspecting content: a second run over already
//! migrated files reports zero changes.

use std::path::Path;

use tracing::{debug, info};

use crate::manifest::Manifest;
use crate::report::{RunReport, Summary};
use crate::transform::{Mode, transform};

/// Run every manifest entry and aggregate the results.
pub fn run(root: &Path, manifest: &Manifest, mode: Mode) -> RunReport {
    info!(entries = manifest.entries.len(), ?mode, "migration run started");

    let mut summary = Summary::default();
    let mut files = Vec::with_capacity(manifest.entries.len());
    for entry in &manifest.entries {
        debug!(path = %entry.path.display(), "processing entry");
        let change = transform(root, entry, manifest, mode);
        summary.record(&change);
        files.push(change);
    }

    info!(
        processed = summary.processed,
        changed = summary.changed,
        "migration run finished"
    );
    RunReport { summary, files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MANIFEST: &str = r#"
[[rulesets]]
name = "widgets"

[[rulesets.rules]]
name = "consumer"
kind = "regex_replace"
pattern = 'class (\w+) extends StatelessWidget'
replacement = 'class $1 extends ConsumerWidget'

[[rulesets.rules]]
name = "build-ref"
kind = "replace"
pattern = "Widget build(BuildContext context) {"
replacement = "Widget build(BuildContext context, WidgetRef ref) {"

[[entries]]
path = "login_screen.dart"
rulesets = ["widgets"]

[[entries]]
path = "absent_screen.dart"
rulesets = ["widgets"]
"#;

    #[test]
    fn run_processes_entries_in_declaration_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join("login_screen.dart"),
            "class LoginScreen extends StatelessWidget {\n  Widget build(BuildContext context) {\n}\n",
        )
        .expect("write fixture");

        let manifest = Manifest::parse_str(MANIFEST).expect("manifest");
        let report = run(temp.path(), &manifest, Mode::Apply);

        assert_eq!(report.summary.processed, 2);
        assert_eq!(report.summary.changed, 1);
        assert_eq!(report.summary.missing, 1);
        assert_eq!(report.files[0].path.to_str(), Some("login_screen.dart"));
        assert_eq!(report.files[1].path.to_str(), Some("absent_screen.dart"));

        let stats = report
            .summary
            .rule_counts
            .get("widgets/consumer")
            .expect("stats");
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.attempted, 1);
    }

    #[test]
    fn second_run_is_a_noop() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join("login_screen.dart"),
            "class LoginScreen extends StatelessWidget {\n  Widget build(BuildContext context) {\n}\n",
        )
        .expect("write fixture");

        let manifest = Manifest::parse_str(MANIFEST).expect("manifest");
        let first = run(temp.path(), &manifest, Mode::Apply);
        assert_eq!(first.summary.changed, 1);

        let second = run(temp.path(), &manifest, Mode::Apply);
        assert_eq!(second.summary.changed, 0);
        assert!(second.files.iter().all(|change| !change.changed));
    }
}
