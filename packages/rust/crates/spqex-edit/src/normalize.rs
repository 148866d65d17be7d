//! Query text normalization.
//!
//! Pure transforms that turn a Go literal into standalone query text a
//! linter will accept. `fmt` verbs are replaced with fixed sentinels:
//!
//! | verb | sentinel         |
//! |------|------------------|
//! | `%d` | `-999`           |
//! | `%v` | `_DUMMY_VALUE_`  |
//! | `%s` | `_DUMMY_STRING_` |
//!
//! Any other verb is passed through unresolved. Restoring verbs in command
//! output goes through [`Placeholders`], which only touches the sentinels
//! that were filled in.

pub use spqex_executor::strip_surrounding_newlines;

const PLAIN_QUOTE: u8 = b'"';
const RAW_QUOTE: u8 = b'`';
const MARKER: char = '%';

const PLACEHOLDERS: [(char, &str); 3] = [
    ('d', "-999"),
    ('v', "_DUMMY_VALUE_"),
    ('s', "_DUMMY_STRING_"),
];

fn sentinel_for(verb: char) -> Option<&'static str> {
    PLACEHOLDERS
        .iter()
        .find(|(v, _)| *v == verb)
        .map(|(_, sentinel)| *sentinel)
}

/// Remove one matching pair of `"` or `` ` `` delimiters.
///
/// Input shorter than two bytes, or whose ends are not the same quote
/// character, is returned unchanged.
#[must_use]
pub fn strip_delimiters(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() < 2 {
        return raw;
    }
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if first == last && (first == PLAIN_QUOTE || first == RAW_QUOTE) {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Remove every raw-string delimiter from `text`.
#[must_use]
pub fn collapse_raw_delimiters(text: &str) -> String {
    text.replace(char::from(RAW_QUOTE), "")
}

/// Replace `%d`, `%v` and `%s` with their sentinels.
///
/// A marker always consumes the character after it, so `%%s` stays `%%s`.
/// A trailing lone `%` is kept.
#[must_use]
pub fn fill_placeholders(text: &str) -> String {
    fill_placeholders_tracked(text).0
}

/// Where [`fill_placeholders_tracked`] put its sentinels.
///
/// Every sentinel occurrence in the filled text is recorded in order,
/// including ones the template already contained, so that only the filled
/// ones are turned back into verbs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    marks: Vec<Mark>,
    filled: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Mark {
    sentinel: &'static str,
    verb: Option<char>,
}

impl Placeholders {
    /// Whether any verb was replaced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Put the verbs back into command output.
    ///
    /// The output must carry the same sentinels, in the same order, as the
    /// filled text; otherwise there is no way to tell which occurrence
    /// came from which verb and `None` is returned.
    #[must_use]
    pub fn restore(&self, output: &str) -> Option<String> {
        if self.is_empty() {
            return Some(output.to_string());
        }
        // A filled sentinel swallowed by a neighbouring match cannot be
        // told apart from template text.
        if self.marks.iter().filter(|mark| mark.verb.is_some()).count() != self.filled {
            return None;
        }
        let found = scan_sentinels(output);
        if found.len() != self.marks.len()
            || found
                .iter()
                .zip(&self.marks)
                .any(|((_, sentinel), mark)| *sentinel != mark.sentinel)
        {
            return None;
        }

        let mut restored = String::with_capacity(output.len());
        let mut last = 0;
        for ((start, sentinel), mark) in found.iter().zip(&self.marks) {
            if let Some(verb) = mark.verb {
                restored.push_str(&output[last..*start]);
                restored.push(MARKER);
                restored.push(verb);
                last = start + sentinel.len();
            }
        }
        restored.push_str(&output[last..]);
        Some(restored)
    }
}

/// Leftmost non-overlapping sentinel occurrences as `(byte offset, sentinel)`.
fn scan_sentinels(text: &str) -> Vec<(usize, &'static str)> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let hit = PLACEHOLDERS
            .iter()
            .map(|(_, sentinel)| *sentinel)
            .find(|sentinel| bytes[i..].starts_with(sentinel.as_bytes()));
        match hit {
            Some(sentinel) => {
                found.push((i, sentinel));
                i += sentinel.len();
            }
            None => i += 1,
        }
    }
    found
}

/// [`fill_placeholders`], also recording where each sentinel went.
#[must_use]
pub fn fill_placeholders_tracked(text: &str) -> (String, Placeholders) {
    let mut out = String::with_capacity(text.len());
    let mut inserted = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != MARKER {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(verb) => match sentinel_for(verb) {
                Some(sentinel) => {
                    inserted.push((out.len(), verb));
                    out.push_str(sentinel);
                }
                None => {
                    out.push(MARKER);
                    out.push(verb);
                }
            },
            None => out.push(MARKER),
        }
    }

    let marks: Vec<Mark> = scan_sentinels(&out)
        .into_iter()
        .map(|(start, sentinel)| Mark {
            sentinel,
            verb: inserted
                .iter()
                .find(|(at, _)| *at == start)
                .map(|(_, verb)| *verb),
        })
        .collect();
    let filled = inserted.len();
    (out, Placeholders { marks, filled })
}

/// Full normalization of a literal's raw text: strip delimiters, collapse
/// raw delimiters, fill placeholders.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    normalize_template(raw).0
}

/// [`normalize_query`] plus the record needed to restore the verbs.
#[must_use]
pub fn normalize_template(raw: &str) -> (String, Placeholders) {
    fill_placeholders_tracked(&collapse_raw_delimiters(strip_delimiters(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_quotes() {
        assert_eq!(strip_delimiters("\"SELECT * FROM T;\""), "SELECT * FROM T;");
    }

    #[test]
    fn test_strip_raw_quotes() {
        assert_eq!(strip_delimiters("`\nSELECT 1\n`"), "\nSELECT 1\n");
    }

    #[test]
    fn test_strip_leaves_short_and_mismatched_input() {
        assert_eq!(strip_delimiters("x"), "x");
        assert_eq!(strip_delimiters(""), "");
        assert_eq!(strip_delimiters("\""), "\"");
        assert_eq!(strip_delimiters("\"SELECT`"), "\"SELECT`");
        assert_eq!(strip_delimiters("`SELECT\""), "`SELECT\"");
        assert_eq!(strip_delimiters("SELECT"), "SELECT");
    }

    #[test]
    fn test_strip_empty_literal() {
        assert_eq!(strip_delimiters("\"\""), "");
        assert_eq!(strip_delimiters("``"), "");
    }

    #[test]
    fn test_collapse_raw_delimiters() {
        assert_eq!(collapse_raw_delimiters("SELECT `a` FROM `t`"), "SELECT a FROM t");
        assert_eq!(collapse_raw_delimiters("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_fill_each_verb() {
        assert_eq!(fill_placeholders("WHERE name = %s;"), "WHERE name = _DUMMY_STRING_;");
        assert_eq!(fill_placeholders("LIMIT %d;"), "LIMIT -999;");
        assert_eq!(fill_placeholders("WHERE x = %v;"), "WHERE x = _DUMMY_VALUE_;");
    }

    #[test]
    fn test_fill_mixed_verbs_in_order() {
        assert_eq!(
            fill_placeholders("SELECT %s FROM %v LIMIT %d OFFSET %d"),
            "SELECT _DUMMY_STRING_ FROM _DUMMY_VALUE_ LIMIT -999 OFFSET -999"
        );
    }

    #[test]
    fn test_fill_passes_unknown_verbs_through() {
        assert_eq!(fill_placeholders("x = %q AND y = %x"), "x = %q AND y = %x");
        assert_eq!(fill_placeholders("100%%s"), "100%%s");
        assert_eq!(fill_placeholders("LIKE 'a%'"), "LIKE 'a%'");
        assert_eq!(fill_placeholders("rate 5%"), "rate 5%");
    }

    #[test]
    fn test_restore_round_trip() {
        let template = "SELECT * FROM %s WHERE id = %d AND v = %v";
        let (filled, placeholders) = fill_placeholders_tracked(template);
        assert_eq!(placeholders.restore(&filled).as_deref(), Some(template));
    }

    #[test]
    fn test_restore_leaves_literal_sentinels_alone() {
        let template = "SELECT * FROM t WHERE x > -999 AND n = %s";
        let (filled, placeholders) = fill_placeholders_tracked(template);
        assert_eq!(filled, "SELECT * FROM t WHERE x > -999 AND n = _DUMMY_STRING_");
        assert_eq!(
            placeholders.restore("SELECT *\nFROM t\nWHERE x > -999 AND n = _DUMMY_STRING_").as_deref(),
            Some("SELECT *\nFROM t\nWHERE x > -999 AND n = %s")
        );
    }

    #[test]
    fn test_restore_refuses_changed_sentinels() {
        let (_, placeholders) = fill_placeholders_tracked("LIMIT %d OFFSET %d");
        assert_eq!(placeholders.restore("LIMIT -999"), None);
        assert_eq!(placeholders.restore("LIMIT _DUMMY_VALUE_ OFFSET -999"), None);
        assert_eq!(
            placeholders.restore("limit -999 offset -999").as_deref(),
            Some("limit %d offset %d")
        );
    }

    #[test]
    fn test_restore_without_verbs_is_identity() {
        let (_, placeholders) = fill_placeholders_tracked("WHERE x > -999");
        assert!(placeholders.is_empty());
        assert_eq!(placeholders.restore("where x > 0").as_deref(), Some("where x > 0"));
    }

    #[test]
    fn test_swallowed_sentinel_cannot_be_restored() {
        // The scan matches the template's text plus the first byte of the
        // filled sentinel.
        let (filled, placeholders) = fill_placeholders_tracked("_DUMMY_STRING%s");
        assert_eq!(filled, "_DUMMY_STRING_DUMMY_STRING_");
        assert_eq!(placeholders.restore(&filled), None);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(
            normalize_query("\"SELECT * FROM TABLE ORDER BY %s;\""),
            "SELECT * FROM TABLE ORDER BY _DUMMY_STRING_;"
        );
        assert_eq!(normalize_query("`\nSELECT 1;\n`"), "\nSELECT 1;\n");
    }
}
