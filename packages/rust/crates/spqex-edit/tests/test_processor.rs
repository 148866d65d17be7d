//! Tests for processor module - the per-file pipeline against fixture files.

use std::path::{Path, PathBuf};

use spqex_ast::SourcePosition;
use spqex_edit::{EditError, ProcessorConfig, SiteProcessor};

const REPLACE_TABLE: &str = "sed 's/TABLE/TABLE_A/'";
const REJECT_HAS_ERROR: &str = r#"input=$(cat)
case "$input" in
*HAS_ERROR*) echo "COMMAND ERROR"; exit 1 ;;
esac
printf '%s\n' "$input" | sed 's/TABLE/TABLE_A/'"#;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("Read fixture")
}

fn processor(command: &str) -> SiteProcessor {
    SiteProcessor::new(command, ProcessorConfig::default())
}

#[tokio::test]
async fn test_replace_matches_golden() {
    let result = processor(REPLACE_TABLE)
        .process_file(&fixture("format.go"), true)
        .await
        .expect("Process format.go");

    assert!(result.changed);
    assert!(result.failures.is_empty());
    assert_eq!(result.exit_code(), 0);
    assert_eq!(result.output.as_deref(), Some(read_fixture("format_golden.go").as_str()));
}

#[tokio::test]
async fn test_partial_failure_rewrites_the_rest() {
    let result = processor(REJECT_HAS_ERROR)
        .process_file(&fixture("has_error.go"), true)
        .await
        .expect("Process has_error.go");

    assert!(result.changed);
    assert_eq!(result.exit_code(), 1);
    assert_eq!(result.failures.len(), 1);

    let failure = &result.failures[0];
    assert_eq!(failure.position, SourcePosition { line: 16, column: 11 });
    assert_eq!(failure.query, "SELECT * FROM HAS_ERROR;");
    assert_eq!(failure.message, "COMMAND ERROR");
    assert_eq!(
        result.output.as_deref(),
        Some(read_fixture("has_error_golden.go").as_str())
    );
}

#[tokio::test]
async fn test_diagnostic_block_format() {
    let path = fixture("has_error.go");
    let result = processor(REJECT_HAS_ERROR)
        .process_file(&path, false)
        .await
        .expect("Process has_error.go");

    assert_eq!(
        result.to_string(),
        format!(
            "{}:16:11:\nSELECT * FROM HAS_ERROR;\nCOMMAND ERROR",
            path.display()
        )
    );
}

#[tokio::test]
async fn test_format_template_keeps_its_verbs() {
    let result = processor(REPLACE_TABLE)
        .process_file(&fixture("sprintf.go"), true)
        .await
        .expect("Process sprintf.go");

    assert!(result.changed);
    assert_eq!(
        result.output.as_deref(),
        Some(read_fixture("sprintf_golden.go").as_str())
    );
}

#[tokio::test]
async fn test_format_template_is_sent_with_placeholders() {
    let result = processor("echo rejected; exit 1")
        .process_file(&fixture("sprintf.go"), false)
        .await
        .expect("Process sprintf.go");

    assert_eq!(result.failures.len(), 1);
    assert_eq!(
        result.failures[0].query,
        "SELECT * FROM TABLE ORDER BY _DUMMY_STRING_;"
    );
    assert_eq!(result.failures[0].message, "rejected");
}

#[tokio::test]
async fn test_identity_command_is_idempotent() {
    let source = read_fixture("multiline.go");
    let result = processor("cat")
        .process_file(&fixture("multiline.go"), true)
        .await
        .expect("Process multiline.go");

    assert!(result.changed);
    assert_eq!(result.output.as_deref(), Some(source.as_str()));
}

#[tokio::test]
async fn test_multiline_output_is_wrapped_in_raw_string() {
    let source = "package q\n\nvar s = spanner.Statement{SQL: \"SELECT * FROM T;\"}\n";
    let result = processor("sed 's/ FROM /|FROM /' | tr '|' '\\n'")
        .process(source.to_string(), Path::new("q.go"), true)
        .await
        .expect("Process inline source");

    assert_eq!(
        result.output.as_deref(),
        Some("package q\n\nvar s = spanner.Statement{SQL: `\nSELECT *\nFROM T;\n`}\n")
    );
}

#[tokio::test]
async fn test_identity_command_keeps_escaped_literal() {
    let source = r#"package q

var s = spanner.Statement{SQL: "SELECT \"a\" FROM t\nWHERE 1"}
"#;
    let result = processor("cat")
        .process(source.to_string(), Path::new("q.go"), true)
        .await
        .expect("Process inline source");

    assert!(result.changed);
    assert_eq!(result.output.as_deref(), Some(source));
}

#[tokio::test]
async fn test_identity_command_keeps_raw_literal_with_quotes() {
    let source = "package q\n\nvar s = spanner.Statement{SQL: `SELECT \"a\" FROM t WHERE x ~ '\\d'`}\n";
    let result = processor("cat")
        .process(source.to_string(), Path::new("q.go"), true)
        .await
        .expect("Process inline source");

    assert_eq!(result.output.as_deref(), Some(source));
}

#[tokio::test]
async fn test_template_with_sentinel_value_keeps_its_text() {
    let source = r#"package q

var s = spanner.Statement{SQL: fmt.Sprintf("SELECT * FROM t WHERE x > -999 AND n = %s", v)}
"#;
    let result = processor("cat")
        .process(source.to_string(), Path::new("q.go"), true)
        .await
        .expect("Process inline source");

    assert_eq!(result.output.as_deref(), Some(source));
}

#[tokio::test]
async fn test_dropped_placeholder_leaves_template_alone() {
    let source = r#"package q

var s = spanner.Statement{SQL: fmt.Sprintf("SELECT * FROM t LIMIT %d", n)}
"#;
    let result = processor("sed 's/ LIMIT -999//'")
        .process(source.to_string(), Path::new("q.go"), true)
        .await
        .expect("Process inline source");

    assert!(!result.changed);
    assert!(result.output.is_none());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].query, "SELECT * FROM t LIMIT -999");
}

#[tokio::test]
async fn test_all_failures_leave_file_unchanged() {
    let result = processor("echo 'syntax error'; exit 1")
        .process_file(&fixture("format.go"), true)
        .await
        .expect("Process format.go");

    assert!(!result.changed);
    assert!(result.output.is_none());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].message, "syntax error");
}

#[tokio::test]
async fn test_lint_mode_never_produces_output() {
    let result = processor(REPLACE_TABLE)
        .process_file(&fixture("format.go"), false)
        .await
        .expect("Process format.go");

    assert!(!result.changed);
    assert!(result.output.is_none());
    assert!(result.failures.is_empty());
}

#[tokio::test]
async fn test_file_without_sites() {
    let result = processor("exit 1")
        .process_file(&fixture("no_sites.go"), true)
        .await
        .expect("Process no_sites.go");

    assert!(!result.changed);
    assert!(result.output.is_none());
    assert!(result.failures.is_empty());
}

#[tokio::test]
async fn test_syntax_error_is_hard() {
    let err = processor("cat")
        .process("package q\n\nfunc {\n".to_string(), Path::new("bad.go"), true)
        .await
        .expect_err("Broken source must fail");

    assert!(matches!(err, EditError::Parse(_)));
}

#[tokio::test]
async fn test_missing_file_is_a_read_error() {
    let err = processor("cat")
        .process_file(&fixture("missing.go"), false)
        .await
        .expect_err("Missing file must fail");

    assert!(matches!(err, EditError::Read { .. }));
}
