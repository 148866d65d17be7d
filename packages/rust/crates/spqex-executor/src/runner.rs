//! Shell command runner.
//!
//! One invocation per literal: the query goes in on stdin, the combined
//! output and the exit status come back.

use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{ExecutorError, Result};
use crate::output::strip_surrounding_newlines;

/// Configuration for the command runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Shell used as `<shell> -c <command>`.
    pub shell: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }
}

/// Outcome of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Combined stdout and stderr, surrounding newlines stripped.
    pub output: String,
    /// Process exit code; `-1` when terminated by a signal.
    pub exit_code: i32,
}

impl CommandResult {
    /// Whether the command accepted its input (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands through a shell.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    config: RunnerConfig,
}

impl CommandRunner {
    /// Create a runner using `sh`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Get reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `command` with `input` on stdin and wait for it to exit.
    ///
    /// Stderr is redirected into stdout inside the shell so both streams
    /// interleave the way a terminal would show them. A command that exits
    /// before reading its input is fine.
    ///
    /// # Errors
    /// `Spawn` when the shell cannot be started, `Pipe` when output cannot
    /// be collected. A non-zero exit status is returned as a normal
    /// [`CommandResult`].
    pub async fn run(&self, command: &str, input: &str) -> Result<CommandResult> {
        if self.config.shell.trim().is_empty() {
            return Err(ExecutorError::InvalidConfig("shell must not be empty".to_string()));
        }

        let script = format!("exec 2>&1\n{command}");
        let mut child = Command::new(&self.config.shell)
            .arg("-c")
            .arg(&script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(ExecutorError::Pipe {
                command: command.to_string(),
                source: io::Error::other("stdin was not captured"),
            });
        };

        let feed = async move {
            let written = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            match written {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|source| ExecutorError::Pipe {
            command: command.to_string(),
            source,
        })?;
        fed.map_err(|source| ExecutorError::Pipe {
            command: command.to_string(),
            source,
        })?;

        // Anything the shell wrote before the redirect took effect.
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        let result = CommandResult {
            output: String::from_utf8_lossy(strip_surrounding_newlines(&combined)).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };
        tracing::debug!(
            command,
            exit_code = result.exit_code,
            bytes = result.output.len(),
            "command finished"
        );
        Ok(result)
    }
}
