//! File orchestrator.
//!
//! Fans out one task per file, reduces their results on a single consumer
//! and only then writes changed files back, one task per file.
//!
//! Workers never share state: each sends `(FileTask, result)` over an
//! unbounded channel. The reducer keeps a reorder buffer keyed by
//! discovery index, so diagnostics are printed in discovery order no
//! matter which file finishes first.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::diff::generate_unified_diff;
use crate::error::EditError;
use crate::processor::{ProcessorConfig, SiteProcessor};
use crate::types::{FileTask, ProcessResult, RunMode, RunSummary, WriteFailure};

type FileOutcome = (FileTask, Result<ProcessResult, EditError>);

/// Drives the site processor over many files.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    processor: Arc<SiteProcessor>,
    mode: RunMode,
}

impl Orchestrator {
    /// Create an orchestrator running `command` in `mode`.
    #[must_use]
    pub fn new(command: impl Into<String>, mode: RunMode, config: ProcessorConfig) -> Self {
        Self {
            processor: Arc::new(SiteProcessor::new(command, config)),
            mode,
        }
    }

    /// The configured run mode.
    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Process `files` concurrently and report to `out`.
    ///
    /// Diagnostics go to `out` as each file's turn in discovery order comes
    /// up. In [`RunMode::Fmt`] changed files are written back after every
    /// file has been processed; in [`RunMode::Diff`] their diffs are
    /// written to `out` instead.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Errors
    /// The first hard per-file error in discovery order. In-flight files
    /// are allowed to finish and every hard error is logged, but nothing
    /// is written back.
    pub async fn run<W: Write>(
        &self,
        files: Vec<PathBuf>,
        out: &mut W,
    ) -> Result<RunSummary, EditError> {
        let replace = self.mode.replace_requested();
        tracing::info!(files = files.len(), mode = %self.mode, "processing files");

        let (tx, mut rx) = mpsc::unbounded_channel::<FileOutcome>();
        let mut workers = JoinSet::new();
        for (index, path) in files.into_iter().enumerate() {
            let task = FileTask { index, path };
            let processor = Arc::clone(&self.processor);
            let tx = tx.clone();
            workers.spawn(async move {
                let result = processor.process_file(&task.path, replace).await;
                // Only fails once the reducer has bailed out.
                let _ = tx.send((task, result));
            });
        }
        drop(tx);

        let mut reducer = Reducer::default();
        let mut pending = BTreeMap::new();
        let mut next = 0;
        while let Some((task, result)) = rx.recv().await {
            pending.insert(task.index, (task, result));
            while let Some((task, result)) = pending.remove(&next) {
                reducer.accept(out, task, result)?;
                next += 1;
            }
        }
        // Gaps left by workers that panicked.
        for (task, result) in pending.into_values() {
            reducer.accept(out, task, result)?;
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "file worker failed");
                reducer.fatal.push((usize::MAX, EditError::Task(err.to_string())));
            }
        }

        let Reducer {
            mut summary,
            changed,
            mut fatal,
            ..
        } = reducer;

        if !fatal.is_empty() {
            fatal.sort_by_key(|(index, _)| *index);
            tracing::error!(count = fatal.len(), "hard errors, skipping write-back");
            let (_, first) = fatal.swap_remove(0);
            return Err(first);
        }

        summary.changed = changed.iter().map(|r| r.path.clone()).collect();
        match self.mode {
            RunMode::Lint => {}
            RunMode::Fmt => summary.write_errors = write_back(changed).await,
            RunMode::Diff => self.write_diffs(&changed, out).await?,
        }

        tracing::info!(
            files = summary.files,
            failures = summary.failures,
            changed = summary.changed.len(),
            exit_code = summary.exit_code,
            "run finished"
        );
        Ok(summary)
    }

    async fn write_diffs<W: Write>(
        &self,
        changed: &[ProcessResult],
        out: &mut W,
    ) -> Result<(), EditError> {
        let max_file_size = self.processor.config().max_file_size;
        for result in changed {
            let Some(modified) = &result.output else {
                continue;
            };
            let original = spqex_io::read_text_safe_async(&result.path, max_file_size)
                .await
                .map_err(|source| EditError::Read {
                    path: result.path.display().to_string(),
                    source,
                })?;
            out.write_all(generate_unified_diff(&result.path, &original, modified).as_bytes())?;
        }
        Ok(())
    }
}

/// Single consumer of worker results.
#[derive(Default)]
struct Reducer {
    summary: RunSummary,
    changed: Vec<ProcessResult>,
    fatal: Vec<(usize, EditError)>,
    reported: usize,
}

impl Reducer {
    fn accept<W: Write>(
        &mut self,
        out: &mut W,
        task: FileTask,
        result: Result<ProcessResult, EditError>,
    ) -> Result<(), EditError> {
        self.summary.files += 1;
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(path = %task.path.display(), error = %err, "file processing failed");
                self.fatal.push((task.index, err));
                return Ok(());
            }
        };

        let code = result.exit_code();
        if code != 0 {
            if self.reported > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{result}")?;
            self.reported += 1;
        }
        self.summary.exit_code = self.summary.exit_code.max(code);
        self.summary.failures += result.failures.len();
        if result.changed {
            self.changed.push(result);
        }
        Ok(())
    }
}

/// Write every changed file concurrently; failures never stop the others.
async fn write_back(changed: Vec<ProcessResult>) -> Vec<WriteFailure> {
    let handles: Vec<_> = changed
        .into_iter()
        .filter_map(|result| {
            let ProcessResult { path, output, .. } = result;
            let output = output?;
            let target = path.clone();
            let handle =
                tokio::spawn(async move { spqex_io::write_text_async(&target, &output).await });
            Some((path, handle))
        })
        .collect();

    let mut failures = Vec::new();
    for (path, handle) in handles {
        let message = match handle.await {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => err.to_string(),
            Err(err) => err.to_string(),
        };
        tracing::error!(path = %path.display(), error = %message, "write failed");
        failures.push(WriteFailure { path, message });
    }
    failures
}
