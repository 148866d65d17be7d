//! spqex-ast - Go syntax trees for SQL literal extraction
//!
//! Parses Go sources with tree-sitter and locates the string literals
//! assigned to the query field of a statement struct literal, e.g.
//!
//! ```go
//! spanner.Statement{SQL: "SELECT 1"}
//! spanner.Statement{SQL: fmt.Sprintf("SELECT * FROM %s", table)}
//! ```
//!
//! ## Architecture
//!
//! ```text
//! spqex-ast/src/
//! ├── lib.rs      # Re-exports (entry point)
//! ├── error.rs    # AstError enum
//! ├── parser.rs   # GoParser (tree-sitter-go)
//! ├── unit.rs     # SourceUnit, site arena, rendering
//! └── locator.rs  # TargetShape and the literal matcher
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use spqex_ast::{GoParser, TargetShape};
//!
//! let source = r#"package q
//!
//! var s = spanner.Statement{SQL: "SELECT 1"}
//! "#;
//! let mut unit = GoParser::new()?.parse("q.go", source.to_string())?;
//! let sites = unit.locate_sites(&TargetShape::default());
//! assert_eq!(unit.site(sites[0]).raw(), "\"SELECT 1\"");
//! # Ok::<(), spqex_ast::AstError>(())
//! ```

mod error;
mod locator;
mod parser;
mod unit;

pub use error::AstError;
pub use locator::TargetShape;
pub use parser::GoParser;
pub use unit::{LiteralKind, LiteralSite, SiteId, SourcePosition, SourceUnit};
