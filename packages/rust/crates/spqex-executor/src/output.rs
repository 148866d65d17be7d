//! Command output cleanup.

/// Trim leading and trailing `\n` / `\r` bytes, nothing else.
///
/// Spaces and tabs at either end are significant and kept.
#[must_use]
pub fn strip_surrounding_newlines(bytes: &[u8]) -> &[u8] {
    let is_newline = |b: &u8| *b == b'\n' || *b == b'\r';
    let start = bytes.iter().position(|b| !is_newline(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_newline(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}
