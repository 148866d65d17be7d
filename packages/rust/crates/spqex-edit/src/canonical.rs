//! Formatting pass applied to a rewritten file before it is returned.
//!
//! The rendered text must still parse as Go. The file end is normalised to
//! a single newline, and an optional external formatter (e.g. `gofmt`)
//! gets the final say.

use std::path::Path;

use spqex_ast::GoParser;
use spqex_executor::CommandRunner;

use crate::error::EditError;

/// Canonicalize a rewritten Go source.
///
/// # Errors
/// `EditError::Format` when the text no longer parses or the formatter
/// exits non-zero; `EditError::Command` when the formatter cannot run.
pub async fn canonicalize(
    source: &str,
    path: &Path,
    format_command: Option<&str>,
    runner: &CommandRunner,
) -> Result<String, EditError> {
    check_syntax(source, path)?;
    let mut text = with_single_trailing_newline(source);

    if let Some(command) = format_command.filter(|c| !c.trim().is_empty()) {
        let result = runner.run(command, &text).await?;
        if !result.success() {
            return Err(EditError::Format {
                path: path.display().to_string(),
                message: result.output,
            });
        }
        text = with_single_trailing_newline(&result.output);
    }

    Ok(text)
}

fn check_syntax(source: &str, path: &Path) -> Result<(), EditError> {
    GoParser::new()?
        .check(path, source)
        .map_err(|err| EditError::Format {
            path: path.display().to_string(),
            message: err.to_string(),
        })
}

fn with_single_trailing_newline(source: &str) -> String {
    let mut text = source.trim_end_matches('\n').to_string();
    text.push('\n');
    text
}
