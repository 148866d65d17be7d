//! Runtime settings loader for spqex.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/.spqex.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/spqex/settings.yaml`
//!
//! Merge precedence is user over system; command line flags are merged on
//! top by the binary.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use spqex_ast::TargetShape;
use spqex_edit::{ProcessorConfig, RunMode};
use spqex_executor::RunnerConfig;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = ".spqex.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "spqex/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";
const DEFAULT_FORMAT_COMMAND: &str = "gofmt";
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// All settings; every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Shell command each query is piped through.
    pub command: Option<String>,
    /// `lint`, `fmt` or `diff`.
    pub mode: Option<RunMode>,
    /// Shell used to run commands.
    pub shell: Option<String>,
    /// Formatter for rewritten files (e.g. `gofmt`).
    pub format_command: Option<String>,
    /// Largest source file read, in bytes.
    pub max_file_size: Option<u64>,
    /// Literal shape to extract.
    #[serde(default)]
    pub target: TargetSettings,
}

/// Overrides for the extracted literal shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TargetSettings {
    /// Struct type name (`Statement`).
    pub type_name: Option<String>,
    /// Query field name (`SQL`).
    pub field_name: Option<String>,
    /// Format call package (`fmt`).
    pub format_package: Option<String>,
    /// Format call function (`Sprintf`).
    pub format_function: Option<String>,
}

impl Settings {
    /// Layer `overlay` on top of `self`; set overlay fields win.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            command: overlay.command.or(self.command),
            mode: overlay.mode.or(self.mode),
            shell: overlay.shell.or(self.shell),
            format_command: overlay.format_command.or(self.format_command),
            max_file_size: overlay.max_file_size.or(self.max_file_size),
            target: self.target.merge(overlay.target),
        }
    }

    /// Use `gofmt` for rewritten files when no formatter is configured and
    /// it is on `PATH`. An explicitly empty `format_command` opts out.
    #[must_use]
    pub fn with_default_formatter(mut self) -> Self {
        if self.format_command.is_none() {
            match which::which(DEFAULT_FORMAT_COMMAND) {
                Ok(path) => {
                    tracing::debug!(path = %path.display(), "formatting rewritten files with gofmt");
                    self.format_command = Some(DEFAULT_FORMAT_COMMAND.to_string());
                }
                Err(_) => tracing::debug!("gofmt not found; rewritten files are only syntax-checked"),
            }
        }
        self
    }

    /// Run mode, `lint` when unset.
    #[must_use]
    pub fn run_mode(&self) -> RunMode {
        self.mode.unwrap_or_default()
    }

    /// Processor configuration with defaults filled in.
    #[must_use]
    pub fn processor_config(&self) -> ProcessorConfig {
        let defaults = ProcessorConfig::default();
        ProcessorConfig {
            shape: self.target.shape(),
            runner: self
                .shell
                .clone()
                .map_or(defaults.runner, |shell| RunnerConfig { shell }),
            format_command: self
                .format_command
                .clone()
                .filter(|command| !command.trim().is_empty()),
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
        }
    }
}

impl TargetSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            type_name: overlay.type_name.or(self.type_name),
            field_name: overlay.field_name.or(self.field_name),
            format_package: overlay.format_package.or(self.format_package),
            format_function: overlay.format_function.or(self.format_function),
        }
    }

    /// Target shape with defaults filled in.
    #[must_use]
    pub fn shape(&self) -> TargetShape {
        let defaults = TargetShape::default();
        TargetShape {
            type_name: self.type_name.clone().unwrap_or(defaults.type_name),
            field_name: self.field_name.clone().unwrap_or(defaults.field_name),
            format_package: self
                .format_package
                .clone()
                .unwrap_or(defaults.format_package),
            format_function: self
                .format_function
                .clone()
                .unwrap_or(defaults.format_function),
        }
    }
}

/// Load system and user settings from their default locations.
#[must_use]
pub fn load_settings() -> Settings {
    let (system_path, user_path) = settings_paths();
    load_settings_from_paths(&system_path, &user_path)
}

/// Default `(system, user)` settings paths.
#[doc(hidden)]
#[must_use]
pub fn settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// Load and merge settings from explicit paths.
#[doc(hidden)]
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> Settings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return Settings::default();
        }
    };
    if raw.trim().is_empty() {
        return Settings::default();
    }
    match serde_yaml::from_str::<Settings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            Settings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to `PRJ_ROOT`/cwd.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err()
        && let Some(current) = CONFIG_HOME_OVERRIDE.get()
        && current != &path
    {
        tracing::warn!(
            current = %current.display(),
            ignored = %path.display(),
            "config home override already set; ignoring subsequent value"
        );
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
        return absolutize(project_root, path.clone());
    }

    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
