//! Error types for command execution.

use thiserror::Error;

/// Executor-specific errors.
///
/// A command that runs and exits non-zero is not an error; see
/// [`CommandResult`](crate::CommandResult).
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The shell could not be spawned.
    #[error("failed to execute command {command:?}: {source}")]
    Spawn {
        /// Command line handed to the shell.
        command: String,
        /// Underlying spawn failure.
        source: std::io::Error,
    },

    /// Feeding stdin or collecting output failed.
    #[error("failed to communicate with command {command:?}: {source}")]
    Pipe {
        /// Command line handed to the shell.
        command: String,
        /// Underlying pipe failure.
        source: std::io::Error,
    },

    /// Invalid runner configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, ExecutorError>;
