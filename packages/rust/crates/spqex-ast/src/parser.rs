//! Tree-sitter based Go parser.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::AstError;
use crate::unit::{SourcePosition, SourceUnit};

const SNIPPET_MAX_CHARS: usize = 40;

/// Tree-sitter based Go parser.
///
/// Not `Sync`; create one per task. Construction only loads the grammar.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a new parser.
    ///
    /// # Errors
    /// Returns `AstError::Language` when the grammar ABI is not supported by
    /// the linked tree-sitter runtime.
    pub fn new() -> Result<Self, AstError> {
        let language: Language = tree_sitter_go::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AstError::Language(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `source` into a [`SourceUnit`] owning both text and tree.
    ///
    /// # Errors
    /// Any `ERROR` or missing node in the tree is reported as
    /// `AstError::Syntax`; tree-sitter's recovery is never trusted for
    /// rewriting.
    pub fn parse<P: AsRef<Path>>(
        &mut self,
        path: P,
        source: String,
    ) -> Result<SourceUnit, AstError> {
        let path = path.as_ref();
        let tree = self.parse_tree(path, &source)?;
        Ok(SourceUnit::new(path.to_path_buf(), source, tree))
    }

    /// Check that `source` parses cleanly without keeping the tree.
    ///
    /// # Errors
    /// Same as [`GoParser::parse`].
    pub fn check<P: AsRef<Path>>(&mut self, path: P, source: &str) -> Result<(), AstError> {
        self.parse_tree(path.as_ref(), source).map(|_| ())
    }

    fn parse_tree(&mut self, path: &Path, source: &str) -> Result<Tree, AstError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AstError::NoTree {
                path: path.display().to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            let bad = first_error_node(root).unwrap_or(root);
            let snippet: String = source
                .get(bad.byte_range())
                .unwrap_or_default()
                .chars()
                .take(SNIPPET_MAX_CHARS)
                .collect();
            return Err(AstError::Syntax {
                path: path.display().to_string(),
                position: SourcePosition::from_point(bad.start_position()),
                snippet,
            });
        }

        Ok(tree)
    }
}

/// First `ERROR` or missing node in document order.
fn first_error_node(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        // Only descend into subtrees that contain an error.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
