//! One `spqex` run over a root directory.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use spqex_edit::{Orchestrator, ProcessorConfig, RunMode, RunSummary};

use crate::settings::Settings;

/// Everything a run needs, resolved from settings and flags.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Directory (or single file) to scan.
    pub root: PathBuf,
    /// Shell command each query is piped through.
    pub command: String,
    /// What to do with successful output.
    pub mode: RunMode,
    /// Processor configuration.
    pub config: ProcessorConfig,
}

impl RunRequest {
    /// Resolve a request for `root` from merged settings.
    ///
    /// # Errors
    /// When no command is configured.
    pub fn from_settings(root: impl Into<PathBuf>, settings: &Settings) -> anyhow::Result<Self> {
        let Some(command) = settings
            .command
            .clone()
            .filter(|command| !command.trim().is_empty())
        else {
            bail!("no command specified: pass --cmd or set `command` in settings");
        };
        Ok(Self {
            root: root.into(),
            command,
            mode: settings.run_mode(),
            config: settings.processor_config(),
        })
    }
}

/// Discover Go files under the root and process them.
///
/// Diagnostics, diffs and write failures go to `out`.
///
/// # Errors
/// Discovery failures and hard per-file errors.
pub async fn run<W: Write>(request: &RunRequest, out: &mut W) -> anyhow::Result<RunSummary> {
    let files = spqex_io::discover_go_files(&request.root).with_context(|| {
        format!("failed to discover Go files under {}", request.root.display())
    })?;
    tracing::debug!(root = %request.root.display(), files = files.len(), "discovered files");

    let orchestrator = Orchestrator::new(
        request.command.clone(),
        request.mode,
        request.config.clone(),
    );
    let summary = orchestrator.run(files, out).await?;

    for failure in &summary.write_errors {
        writeln!(out, "{failure}")?;
    }
    Ok(summary)
}
