//! Site processor: the per-file pipeline.
//!
//! parse → locate → (normalize → run → classify → overwrite)* → render →
//! canonicalize. Sites of one file run strictly one after another.

use std::path::Path;

use spqex_ast::{GoParser, LiteralKind, SiteId, SourceUnit, TargetShape};
use spqex_executor::{CommandRunner, RunnerConfig};

use crate::canonical::canonicalize;
use crate::error::EditError;
use crate::normalize::normalize_template;
use crate::quote::{LiteralStyle, requote};
use crate::types::{ProcessResult, SiteFailure, SiteOutcome};

const PLACEHOLDERS_CHANGED: &str =
    "command output does not keep the format placeholders in order; literal left unchanged";

/// Configuration for the site processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Literal shape to extract.
    pub shape: TargetShape,
    /// Shell used for the query command and the formatter.
    pub runner: RunnerConfig,
    /// Formatter run over rewritten files (e.g. `gofmt`).
    ///
    /// Without one the formatting pass only checks that the rewritten file
    /// still parses and ends with a single newline.
    pub format_command: Option<String>,
    /// Maximum source file size in bytes.
    pub max_file_size: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            shape: TargetShape::default(),
            runner: RunnerConfig::default(),
            format_command: None,
            max_file_size: spqex_io::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Runs one external command over every literal site of a file.
#[derive(Debug, Clone)]
pub struct SiteProcessor {
    command: String,
    config: ProcessorConfig,
    runner: CommandRunner,
}

impl SiteProcessor {
    /// Create a processor for `command` (a shell command line).
    #[must_use]
    pub fn new(command: impl Into<String>, config: ProcessorConfig) -> Self {
        let runner = CommandRunner::with_config(config.runner.clone());
        Self {
            command: command.into(),
            config,
            runner,
        }
    }

    /// The external command line.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Get reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Read `path` and process it.
    ///
    /// # Errors
    /// `EditError::Read` when the file cannot be read, otherwise as
    /// [`SiteProcessor::process`].
    pub async fn process_file(
        &self,
        path: &Path,
        replace: bool,
    ) -> Result<ProcessResult, EditError> {
        let source = spqex_io::read_text_safe_async(path, self.config.max_file_size)
            .await
            .map_err(|source| EditError::Read {
                path: path.display().to_string(),
                source,
            })?;
        self.process(source, path, replace).await
    }

    /// Process one file's source text.
    ///
    /// A command exiting non-zero yields a [`SiteFailure`] and leaves the
    /// literal alone. When `replace` is set and at least one literal
    /// succeeded, the result carries the rewritten file.
    ///
    /// # Errors
    /// Parse failures, command launch failures and formatting failures.
    pub async fn process(
        &self,
        source: String,
        path: &Path,
        replace: bool,
    ) -> Result<ProcessResult, EditError> {
        let mut unit = GoParser::new()?.parse(path, source)?;
        let sites = unit.locate_sites(&self.config.shape);
        if sites.is_empty() {
            return Ok(ProcessResult::unchanged(path));
        }

        let mut failures = Vec::new();
        let mut succeeded = 0usize;
        for id in sites {
            match self.process_site(&mut unit, id, replace).await? {
                SiteOutcome::Success(_) => succeeded += 1,
                SiteOutcome::Failure(failure) => failures.push(failure),
            }
        }

        tracing::debug!(
            path = %path.display(),
            succeeded,
            failed = failures.len(),
            "processed literal sites"
        );

        if !replace || succeeded == 0 {
            return Ok(ProcessResult {
                path: path.to_path_buf(),
                output: None,
                failures,
                changed: false,
            });
        }

        let output = canonicalize(
            &unit.render(),
            path,
            self.config.format_command.as_deref(),
            &self.runner,
        )
        .await?;

        Ok(ProcessResult {
            path: path.to_path_buf(),
            output: Some(output),
            failures,
            changed: true,
        })
    }

    async fn process_site(
        &self,
        unit: &mut SourceUnit,
        id: SiteId,
        replace: bool,
    ) -> Result<SiteOutcome, EditError> {
        let site = unit.site(id);
        let (query, placeholders) = normalize_template(site.raw());
        let style = LiteralStyle::of(site.raw());
        let position = site.position();
        let kind = site.kind();

        let result = self.runner.run(&self.command, &query).await?;
        if !result.success() {
            tracing::debug!(
                path = %unit.path().display(),
                %position,
                exit_code = result.exit_code,
                "command rejected query"
            );
            return Ok(SiteOutcome::Failure(SiteFailure {
                message: result.output,
                position,
                query,
            }));
        }

        let text = match kind {
            LiteralKind::Format => placeholders.restore(&result.output),
            LiteralKind::Plain => Some(result.output),
        };
        let Some(text) = text else {
            tracing::warn!(
                path = %unit.path().display(),
                %position,
                "command output changed the format placeholders"
            );
            if !replace {
                return Ok(SiteOutcome::Success(unit.site(id).raw().to_string()));
            }
            return Ok(SiteOutcome::Failure(SiteFailure {
                message: PLACEHOLDERS_CHANGED.to_string(),
                position,
                query,
            }));
        };

        let literal = requote(&text, style);
        if replace {
            unit.overwrite(id, literal.clone());
        }
        Ok(SiteOutcome::Success(literal))
    }
}
