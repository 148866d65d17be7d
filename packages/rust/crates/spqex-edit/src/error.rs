//! Error types for the extraction and rewrite pipeline.
//!
//! Every variant is fatal for the file it came from. A command rejecting a
//! query is not an error; it becomes a [`SiteFailure`](crate::SiteFailure).

use spqex_ast::AstError;
use spqex_executor::ExecutorError;
use spqex_io::IoError;
use thiserror::Error;

/// Error types for edit operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// Reading the source file failed.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// File being read.
        path: String,
        /// Underlying I/O failure.
        source: IoError,
    },

    /// Source did not parse.
    #[error(transparent)]
    Parse(#[from] AstError),

    /// The external command could not be run.
    #[error(transparent)]
    Command(#[from] ExecutorError),

    /// The rewritten source failed the formatting pass.
    #[error("failed to format source {path}: {message}")]
    Format {
        /// File being formatted.
        path: String,
        /// Parser or formatter output.
        message: String,
    },

    /// Writing diagnostics or diffs to the output stream failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// A per-file task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}
