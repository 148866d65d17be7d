//! Error types for Go parsing.

use thiserror::Error;

use crate::unit::SourcePosition;

/// Errors raised while turning Go source into a [`SourceUnit`](crate::SourceUnit).
#[derive(Error, Debug)]
pub enum AstError {
    /// The tree-sitter grammar could not be loaded.
    #[error("Language error: {0}")]
    Language(String),

    /// The parser produced no tree at all.
    #[error("Parse error: {path}: parser returned no tree")]
    NoTree {
        /// File being parsed.
        path: String,
    },

    /// The source contains a syntax error.
    #[error("Parse error: {path}:{position}: syntax error near {snippet:?}")]
    Syntax {
        /// File being parsed.
        path: String,
        /// Location of the first error node.
        position: SourcePosition,
        /// Source text of the error node, truncated.
        snippet: String,
    },
}
