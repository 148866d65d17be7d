//! spqex-executor - External command runner
//!
//! Pipes one query at a time through a user supplied shell command:
//! - Query text on standard input
//! - Standard output and standard error captured as one stream
//! - Exit status recorded, never turned into an error

mod error;
mod output;
mod runner;

pub use error::{ExecutorError, Result};
pub use output::strip_surrounding_newlines;
pub use runner::{CommandResult, CommandRunner, RunnerConfig};
