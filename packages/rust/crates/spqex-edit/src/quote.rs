//! Turning command output back into a Go string literal.
//!
//! The command sees the literal's body as written in the source, so the
//! output of an interpreted literal still uses Go escapes (`\"`, `\n`) while
//! the output of a raw literal is plain text. The quoting must keep that
//! text meaning the same thing it meant in the original literal.

/// Delimiter style of the literal the text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralStyle {
    /// `"..."`; the body is escaped.
    Interpreted,
    /// `` `...` ``; the body is taken verbatim.
    Raw,
}

impl LiteralStyle {
    /// Style of a raw literal as it appears in the source.
    #[must_use]
    pub fn of(raw: &str) -> Self {
        if raw.starts_with('`') {
            Self::Raw
        } else {
            Self::Interpreted
        }
    }
}

/// Quote `text` as a Go literal.
///
/// - multi-line text goes into a raw string with the delimiters on their
///   own lines: `` `\n<text>\n` ``
/// - single-line text goes into plain double quotes
///
/// Escaped text (from an interpreted literal) stays escaped: a single line
/// is wrapped as is, and multi-line text holding a `\` is joined with `\n`
/// escapes instead of going into a raw string. Verbatim text (from a raw
/// literal) that double quotes cannot hold as is keeps backticks, and
/// verbatim text containing a backtick is escaped.
#[must_use]
pub fn requote(text: &str, style: LiteralStyle) -> String {
    let multi_line = text.contains('\n');
    match style {
        LiteralStyle::Interpreted if multi_line => {
            if text.contains('\\') || text.contains('`') {
                join_escaped_lines(text)
            } else {
                format!("`\n{text}\n`")
            }
        }
        LiteralStyle::Interpreted => format!("\"{text}\""),
        LiteralStyle::Raw if text.contains('`') => escape_interpreted(text),
        LiteralStyle::Raw if multi_line => format!("`\n{text}\n`"),
        LiteralStyle::Raw if text.contains('"') || text.contains('\\') => format!("`{text}`"),
        LiteralStyle::Raw => format!("\"{text}\""),
    }
}

/// Double-quoted literal from already escaped lines.
fn join_escaped_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Double-quoted literal from verbatim text.
fn escape_interpreted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
