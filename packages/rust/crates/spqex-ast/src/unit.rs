//! Parsed Go source and the arena of located literal sites.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tree_sitter::{Point, Tree};

/// 1-based line and byte column, the way Go tooling reports positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SourcePosition {
    /// Line number (1-indexed).
    pub line: usize,
    /// Byte column (1-indexed).
    pub column: usize,
}

impl SourcePosition {
    pub(crate) fn from_point(point: Point) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How a literal site is embedded in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    /// The field value is the string literal itself.
    Plain,
    /// The literal is the template argument of the format call.
    Format,
}

/// Handle to a site in a [`SourceUnit`]'s arena.
///
/// Only valid for the unit that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteId(usize);

/// One matching string literal, as read from the original source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralSite {
    range: Range<usize>,
    position: SourcePosition,
    raw: String,
    kind: LiteralKind,
}

impl LiteralSite {
    pub(crate) fn new(
        range: Range<usize>,
        position: SourcePosition,
        raw: String,
        kind: LiteralKind,
    ) -> Self {
        Self {
            range,
            position,
            raw,
            kind,
        }
    }

    /// Byte range of the literal, delimiters included.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Position of the literal's opening delimiter.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// Literal text exactly as written, delimiters included.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the literal is a plain value or a format template.
    #[must_use]
    pub fn kind(&self) -> LiteralKind {
        self.kind
    }
}

#[derive(Debug)]
struct SiteSlot {
    site: LiteralSite,
    replacement: Option<String>,
}

/// One Go file: its text, its syntax tree and the located sites.
///
/// Sites are never edited in the text directly. An overwrite is recorded
/// next to the site and spliced in by [`SourceUnit::render`], so every byte
/// outside a replaced literal is reproduced unchanged.
pub struct SourceUnit {
    path: PathBuf,
    source: String,
    tree: Tree,
    sites: Vec<SiteSlot>,
}

impl SourceUnit {
    pub(crate) fn new(path: PathBuf, source: String, tree: Tree) -> Self {
        Self {
            path,
            source,
            tree,
            sites: Vec::new(),
        }
    }

    /// Path the unit was parsed from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Concrete syntax tree of the original source.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Replace the arena with `sites` (sorted by offset) and hand out ids.
    pub(crate) fn install_sites(&mut self, mut sites: Vec<LiteralSite>) -> Vec<SiteId> {
        sites.sort_by_key(|site| site.range.start);
        sites.dedup_by_key(|site| site.range.start);
        self.sites = sites
            .into_iter()
            .map(|site| SiteSlot {
                site,
                replacement: None,
            })
            .collect();
        (0..self.sites.len()).map(SiteId).collect()
    }

    /// Number of located sites.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Site record behind `id`.
    ///
    /// # Panics
    /// If `id` was issued by a different unit with more sites.
    #[must_use]
    pub fn site(&self, id: SiteId) -> &LiteralSite {
        &self.sites[id.0].site
    }

    /// Replacement recorded for `id`, if any.
    #[must_use]
    pub fn replacement(&self, id: SiteId) -> Option<&str> {
        self.sites[id.0].replacement.as_deref()
    }

    /// Record `text` (a complete Go literal, delimiters included) as the
    /// new content of the site.
    pub fn overwrite(&mut self, id: SiteId, text: String) {
        let slot = &mut self.sites[id.0];
        tracing::trace!(
            path = %self.path.display(),
            position = %slot.site.position,
            "overwriting literal"
        );
        slot.replacement = Some(text);
    }

    /// Whether any site has a recorded replacement.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.sites.iter().any(|slot| slot.replacement.is_some())
    }

    /// Re-serialize the unit, splicing replacements over their sites.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for slot in &self.sites {
            let Some(text) = &slot.replacement else {
                continue;
            };
            out.push_str(&self.source[cursor..slot.site.range.start]);
            out.push_str(text);
            cursor = slot.site.range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("len", &self.source.len())
            .field("sites", &self.sites)
            .finish_non_exhaustive()
    }
}
