//! Tests for batch module - multi-file orchestration.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use spqex_edit::{EditError, Orchestrator, ProcessorConfig, RunMode};

/// Rejects every query, slowly for the ones mentioning `SLOW`.
const REJECT_ALL: &str = r#"q=$(cat)
case "$q" in
*SLOW*) sleep 0.3 ;;
esac
echo "rejected: $q"
exit 1"#;

fn go_file(dir: &Path, name: &str, query: &str) -> PathBuf {
    let path = dir.join(name);
    let source = format!(
        "package q\n\nvar s = spanner.Statement{{\n\tSQL: \"{query}\",\n}}\n"
    );
    fs::write(&path, source).expect("Write go file");
    path
}

fn orchestrator(command: &str, mode: RunMode) -> Orchestrator {
    Orchestrator::new(command, mode, ProcessorConfig::default())
}

#[tokio::test]
async fn test_diagnostics_follow_discovery_order() {
    let dir = TempDir::new().expect("Create temp dir");
    let slow = go_file(dir.path(), "a.go", "SELECT SLOW");
    let fast = go_file(dir.path(), "b.go", "SELECT FAST");

    let mut out = Vec::new();
    let summary = orchestrator(REJECT_ALL, RunMode::Lint)
        .run(vec![slow.clone(), fast.clone()], &mut out)
        .await
        .expect("Run lint");

    assert_eq!(summary.exit_code, 1);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.failures, 2);
    assert_eq!(
        String::from_utf8(out).expect("Utf8 output"),
        format!(
            "{}:4:7:\nSELECT SLOW\nrejected: SELECT SLOW\n\n{}:4:7:\nSELECT FAST\nrejected: SELECT FAST\n",
            slow.display(),
            fast.display()
        )
    );
}

#[tokio::test]
async fn test_clean_files_print_nothing() {
    let dir = TempDir::new().expect("Create temp dir");
    let clean = go_file(dir.path(), "a.go", "SELECT 1");
    let dirty = go_file(dir.path(), "b.go", "SELECT SLOW");
    let clean2 = go_file(dir.path(), "c.go", "SELECT 2");

    let command = r#"q=$(cat)
case "$q" in
*SLOW*) echo bad; exit 1 ;;
esac
echo "$q""#;
    let mut out = Vec::new();
    let summary = orchestrator(command, RunMode::Lint)
        .run(vec![clean, dirty.clone(), clean2], &mut out)
        .await
        .expect("Run lint");

    assert_eq!(summary.exit_code, 1);
    assert_eq!(
        String::from_utf8(out).expect("Utf8 output"),
        format!("{}:4:7:\nSELECT SLOW\nbad\n", dirty.display())
    );
}

#[tokio::test]
async fn test_clean_run_exits_zero() {
    let dir = TempDir::new().expect("Create temp dir");
    let file = go_file(dir.path(), "a.go", "SELECT 1");
    let before = fs::read_to_string(&file).expect("Read before");

    let mut out = Vec::new();
    let summary = orchestrator("cat", RunMode::Lint)
        .run(vec![file.clone()], &mut out)
        .await
        .expect("Run lint");

    assert_eq!(summary.exit_code, 0);
    assert!(out.is_empty());
    assert!(summary.changed.is_empty());
    assert_eq!(fs::read_to_string(&file).expect("Read after"), before);
}

#[tokio::test]
async fn test_fmt_writes_changed_files() {
    let dir = TempDir::new().expect("Create temp dir");
    let first = go_file(dir.path(), "a.go", "select 1");
    let second = go_file(dir.path(), "b.go", "select 2");

    let mut out = Vec::new();
    let summary = orchestrator("tr a-z A-Z", RunMode::Fmt)
        .run(vec![first.clone(), second.clone()], &mut out)
        .await
        .expect("Run fmt");

    assert_eq!(summary.exit_code, 0);
    assert_eq!(summary.changed, vec![first.clone(), second.clone()]);
    assert!(summary.write_errors.is_empty());
    assert!(
        fs::read_to_string(&first)
            .expect("Read first")
            .contains("SQL: \"SELECT 1\",")
    );
    assert!(
        fs::read_to_string(&second)
            .expect("Read second")
            .contains("SQL: \"SELECT 2\",")
    );
}

#[tokio::test]
async fn test_diff_mode_prints_without_writing() {
    let dir = TempDir::new().expect("Create temp dir");
    let file = go_file(dir.path(), "a.go", "select 1");
    let before = fs::read_to_string(&file).expect("Read before");

    let mut out = Vec::new();
    let summary = orchestrator("tr a-z A-Z", RunMode::Diff)
        .run(vec![file.clone()], &mut out)
        .await
        .expect("Run diff");

    let printed = String::from_utf8(out).expect("Utf8 output");
    assert_eq!(summary.changed, vec![file.clone()]);
    assert!(printed.starts_with(&format!("--- {}\n", file.display())));
    assert!(printed.contains("-\tSQL: \"select 1\",\n"));
    assert!(printed.contains("+\tSQL: \"SELECT 1\",\n"));
    assert_eq!(fs::read_to_string(&file).expect("Read after"), before);
}

#[tokio::test]
async fn test_hard_error_skips_all_writes() {
    let dir = TempDir::new().expect("Create temp dir");
    let good = go_file(dir.path(), "a.go", "select 1");
    let broken = dir.path().join("b.go");
    fs::write(&broken, "package q\n\nfunc {\n").expect("Write broken file");
    let before = fs::read_to_string(&good).expect("Read before");

    let mut out = Vec::new();
    let err = orchestrator("tr a-z A-Z", RunMode::Fmt)
        .run(vec![good.clone(), broken], &mut out)
        .await
        .expect_err("Broken file must fail the run");

    assert!(matches!(err, EditError::Parse(_)));
    assert_eq!(fs::read_to_string(&good).expect("Read after"), before);
}

#[tokio::test]
async fn test_first_hard_error_in_discovery_order_wins() {
    let dir = TempDir::new().expect("Create temp dir");
    let missing = dir.path().join("a.go");
    let broken = dir.path().join("b.go");
    fs::write(&broken, "package q\n\nfunc {\n").expect("Write broken file");

    let mut out = Vec::new();
    let err = orchestrator("cat", RunMode::Lint)
        .run(vec![missing, broken], &mut out)
        .await
        .expect_err("Run must fail");

    assert!(matches!(err, EditError::Read { .. }));
}

#[tokio::test]
async fn test_write_failure_is_collected() {
    let dir = TempDir::new().expect("Create temp dir");
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).expect("Create sub dir");
    let doomed = go_file(&sub, "a.go", "select 1");
    let kept = go_file(dir.path(), "b.go", "select 2");

    // Removes the directory after the file was read, so only the write fails.
    let command = format!(
        "q=$(cat); case \"$q\" in *1*) rm -rf '{}' ;; esac; echo \"$q\" | tr a-z A-Z",
        sub.display()
    );
    let mut out = Vec::new();
    let summary = orchestrator(&command, RunMode::Fmt)
        .run(vec![doomed.clone(), kept.clone()], &mut out)
        .await
        .expect("Run fmt");

    assert_eq!(summary.exit_code, 0);
    assert_eq!(summary.write_errors.len(), 1);
    assert_eq!(summary.write_errors[0].path, doomed);
    assert!(
        fs::read_to_string(&kept)
            .expect("Read kept")
            .contains("SELECT 2")
    );
}

#[test]
fn test_mode_accessor() {
    assert_eq!(orchestrator("cat", RunMode::Diff).mode(), RunMode::Diff);
}
