//! End-to-end migration runs against a temp workspace.
//!
//! Exercises the central correctness property: a manifest applied
//! twice leaves content untouched after the first run.

use std::fs;
use std::path::Path;
use std::process::Command;

use migrate::manifest::Manifest;
use migrate::runner;
use migrate::transform::Mode;

const MANIFEST: &str = r#"
[[rulesets]]
name = "riverpod-widgets"

[[rulesets.rules]]
name = "prefix-provider-import"
kind = "replace"
pattern = "import 'package:provider/provider.dart';"
replacement = "import 'package:provider/provider.dart' as provider;"
only_if_absent = ["as provider"]

[[rulesets.rules]]
name = "consumer-widget"
kind = "regex_replace"
pattern = 'class (\w+Screen) extends StatelessWidget'
replacement = 'class $1 extends ConsumerWidget'

[[rulesets]]
name = "localization"

[[rulesets.rules]]
name = "add-loc"
kind = "insert_after"
anchor = 'Widget build\(BuildContext context\) \{'
insertion = "\n    final loc = AppLocalizations.of(context)!;"
only_if_contains = ["loc."]
only_if_absent = ["final loc ="]

[[entries]]
path = "lib/login_screen.dart"
rulesets = ["riverpod-widgets", "localization"]

[[entries]]
path = "lib/missing_screen.dart"
rulesets = ["riverpod-widgets"]
"#;

const SCREEN: &str = "import 'package:provider/provider.dart';\n\
class LoginScreen extends StatelessWidget {\n\
  Widget build(BuildContext context) {\n\
    return Text(loc.title);\n\
  }\n\
}\n";

fn write_workspace(root: &Path) {
    fs::create_dir_all(root.join("lib")).expect("create lib");
    fs::write(root.join("lib/login_screen.dart"), SCREEN).expect("write screen");
    fs::write(root.join("migration.toml"), MANIFEST).expect("write manifest");
}

#[test]
fn manifest_applied_twice_changes_nothing_on_second_run() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_workspace(temp.path());
    let manifest = Manifest::load(&temp.path().join("migration.toml")).expect("load");

    let first = runner::run(temp.path(), &manifest, Mode::Apply);
    assert_eq!(first.summary.changed, 1);
    assert_eq!(first.summary.missing, 1);

    let migrated = fs::read_to_string(temp.path().join("lib/login_screen.dart")).expect("read");
    assert!(migrated.contains("as provider;"));
    assert!(migrated.contains("extends ConsumerWidget"));
    // Exactly one declaration, immediately after the build-method brace.
    assert_eq!(migrated.matches("final loc =").count(), 1);
    assert!(migrated.contains(
        "Widget build(BuildContext context) {\n    final loc = AppLocalizations.of(context)!;"
    ));

    let second = runner::run(temp.path(), &manifest, Mode::Apply);
    assert_eq!(second.summary.changed, 0);
    assert!(second.files.iter().all(|change| !change.changed));
    let untouched = fs::read_to_string(temp.path().join("lib/login_screen.dart")).expect("read");
    assert_eq!(untouched, migrated);
}

#[test]
fn cli_run_prints_summary_and_writes_report() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_workspace(temp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_migrate"))
        .current_dir(temp.path())
        .args([
            "run",
            "--manifest",
            "migration.toml",
            "--report",
            "report.json",
        ])
        .output()
        .expect("migrate run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("summary: processed=2 changed=1 unchanged=0 missing=1 errored=0"));

    let report = fs::read_to_string(temp.path().join("report.json")).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&report).expect("parse report");
    assert_eq!(value["summary"]["changed"], 1);
    assert_eq!(value["files"][1]["status"], "missing");
}

#[test]
fn cli_dry_run_leaves_files_alone() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_workspace(temp.path());

    let status = Command::new(env!("CARGO_BIN_EXE_migrate"))
        .current_dir(temp.path())
        .args(["run", "--manifest", "migration.toml", "--dry-run"])
        .status()
        .expect("migrate run --dry-run");

    assert!(status.success());
    let contents = fs::read_to_string(temp.path().join("lib/login_screen.dart")).expect("read");
    assert_eq!(contents, SCREEN);
}

#[test]
fn cli_fails_fast_on_malformed_manifest() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("migration.toml"), "not = 'a manifest'").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_migrate"))
        .current_dir(temp.path())
        .args(["run", "--manifest", "migration.toml"])
        .output()
        .expect("migrate run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("entries"));
}
