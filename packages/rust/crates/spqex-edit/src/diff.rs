//! Diff generation utilities.
//!
//! Provides unified diff output for rewritten files using the `similar` crate.

use std::fmt::Write as _;
use std::path::Path;

use similar::{ChangeTag, TextDiff};

/// Generate a unified diff between the original and rewritten file.
///
/// # Returns
/// A string with `---`/`+++` headers, `@@` hunk headers and `+`, `-`, ` `
/// prefixed lines; empty when nothing changed.
#[must_use]
pub fn generate_unified_diff(path: &Path, original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for group in diff.grouped_ops(3) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        if output.is_empty() {
            let _ = writeln!(output, "--- {}", path.display());
            let _ = writeln!(output, "+++ {}", path.display());
        }
        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let _ = writeln!(
            output,
            "@@ -{},{} +{},{} @@",
            old_start + 1,
            last.old_range().end - old_start,
            new_start + 1,
            last.new_range().end - new_start
        );
        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}
