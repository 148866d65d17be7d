//! Core types for the extraction and rewrite pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spqex_ast::SourcePosition;

/// A literal the external command rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFailure {
    /// Combined command output.
    pub message: String,
    /// Position of the literal in its file.
    pub position: SourcePosition,
    /// Normalized query that was sent to the command.
    pub query: String,
}

/// Result of processing one literal site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// Command accepted the query; carries the re-quoted Go literal.
    Success(String),
    /// Command rejected the query.
    Failure(SiteFailure),
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    /// File that was processed.
    pub path: PathBuf,
    /// Rewritten content, present only when `changed` is set.
    pub output: Option<String>,
    /// Rejected literals in source order.
    pub failures: Vec<SiteFailure>,
    /// Replace was requested and at least one literal succeeded.
    pub changed: bool,
}

impl ProcessResult {
    /// A result with no sites, failures or output.
    #[must_use]
    pub fn unchanged(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            output: None,
            failures: Vec::new(),
            changed: false,
        }
    }

    /// `1` when any literal was rejected, `0` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.failures.is_empty())
    }
}

/// Diagnostic blocks, one per failure, separated by blank lines:
///
/// ```text
/// <path>:<line>:<column>:
/// <query>
/// <command output>
/// ```
impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(
                f,
                "{}:{}:\n{}\n{}",
                self.path.display(),
                failure.position,
                failure.query,
                failure.message
            )?;
        }
        Ok(())
    }
}

/// A file handed to a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Discovery index, used to order diagnostics.
    pub index: usize,
    /// File to process.
    pub path: PathBuf,
}

/// What the run does with successful command output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Report rejected literals only.
    #[default]
    Lint,
    /// Rewrite files with the command output.
    #[serde(alias = "format")]
    Fmt,
    /// Print the rewrite as a unified diff instead of writing it.
    Diff,
}

impl RunMode {
    /// Whether successful output replaces the literal.
    #[must_use]
    pub fn replace_requested(self) -> bool {
        matches!(self, Self::Fmt | Self::Diff)
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lint" => Ok(Self::Lint),
            "fmt" | "format" => Ok(Self::Fmt),
            "diff" => Ok(Self::Diff),
            _ => Err(format!(
                "invalid mode {s:?}: valid modes are lint, fmt or diff"
            )),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lint => "lint",
            Self::Fmt => "fmt",
            Self::Diff => "diff",
        })
    }
}

/// A changed file that could not be written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    /// File that failed.
    pub path: PathBuf,
    /// Error description.
    pub message: String,
}

impl fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to write file {}: {}",
            self.path.display(),
            self.message
        )
    }
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Worst per-file exit code.
    pub exit_code: i32,
    /// Number of files processed.
    pub files: usize,
    /// Number of rejected literals across all files.
    pub failures: usize,
    /// Files with a rewrite, in discovery order.
    pub changed: Vec<PathBuf>,
    /// Write-back failures; they do not affect `exit_code`.
    pub write_errors: Vec<WriteFailure>,
}
