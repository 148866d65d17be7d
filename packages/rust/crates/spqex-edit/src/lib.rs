#![allow(clippy::doc_markdown)]

//! spqex-edit - SQL literal checking and rewriting for Go sources
//!
//! Finds the query literals of statement struct literals, pipes each one
//! through an external linter or formatter and, in fmt mode, writes the
//! command output back into the file without touching anything else.
//!
//! # Features
//!
//! - **Normalization**: Quote stripping and `fmt` verb placeholders
//! - **Site Processing**: Per-file pipeline with partial-success rules
//! - **Byte-exact Rewrite**: Only replaced literals change
//! - **Batch Orchestration**: One task per file, deterministic diagnostics
//! - **Diff Preview**: Unified diffs instead of writes
//!
//! # Architecture
//!
//! ```text
//! spqex-edit/src/
//! ├── lib.rs        # Re-exports (this file)
//! ├── error.rs      # EditError enum (thiserror)
//! ├── types.rs      # SiteFailure, ProcessResult, RunSummary, RunMode
//! ├── normalize.rs  # Pure text transforms
//! ├── quote.rs      # Go literal quoting of command output
//! ├── canonical.rs  # Post-rewrite formatting pass
//! ├── processor.rs  # SiteProcessor (one file)
//! ├── batch.rs      # Orchestrator (many files)
//! └── diff.rs       # Unified diff rendering
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use spqex_edit::{Orchestrator, ProcessorConfig, RunMode};
//!
//! let files = spqex_io::discover_go_files("./internal")?;
//! let orchestrator = Orchestrator::new("sqlfluff fix -", RunMode::Fmt, ProcessorConfig::default());
//! let summary = orchestrator.run(files, &mut std::io::stderr()).await?;
//! std::process::exit(summary.exit_code);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod batch;
mod canonical;
mod diff;
mod error;
mod normalize;
mod processor;
mod quote;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use batch::Orchestrator;
pub use canonical::canonicalize;
pub use diff::generate_unified_diff;
pub use error::EditError;
pub use normalize::{
    Placeholders, collapse_raw_delimiters, fill_placeholders, fill_placeholders_tracked,
    normalize_query, normalize_template, strip_delimiters, strip_surrounding_newlines,
};
pub use processor::{ProcessorConfig, SiteProcessor};
pub use quote::{LiteralStyle, requote};
pub use types::{
    FileTask, ProcessResult, RunMode, RunSummary, SiteFailure, SiteOutcome, WriteFailure,
};
