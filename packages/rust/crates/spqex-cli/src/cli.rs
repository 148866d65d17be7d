use std::path::PathBuf;

use clap::Parser;

use spqex_cli::{Settings, TargetSettings};
use spqex_edit::RunMode;

#[derive(Parser)]
#[command(name = "spqex")]
#[command(about = "Pipe SQL literals of Go statement structs through a linter or formatter.")]
pub(crate) struct Cli {
    /// Mode: lint (report only), fmt (rewrite files) or diff (print rewrites).
    #[arg(long)]
    pub(crate) mode: Option<RunMode>,

    /// Command each query is piped through (stdin in, stdout+stderr out).
    #[arg(long = "cmd")]
    pub(crate) command: Option<String>,

    /// Formatter run over rewritten files (default: gofmt when on PATH; "" disables).
    #[arg(long = "format-cmd")]
    pub(crate) format_command: Option<String>,

    /// Shell used to run commands (default: sh).
    #[arg(long)]
    pub(crate) shell: Option<String>,

    /// Struct type holding the query (default: Statement).
    #[arg(long = "type")]
    pub(crate) type_name: Option<String>,

    /// Field holding the query (default: SQL).
    #[arg(long = "field")]
    pub(crate) field_name: Option<String>,

    /// Override config directory.
    #[arg(long)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging (RUST_LOG wins when set).
    #[arg(long, short)]
    pub(crate) verbose: bool,

    /// Directory to scan.
    pub(crate) dir: PathBuf,
}

impl Cli {
    /// Flags as a settings layer, merged over the files.
    pub(crate) fn settings_overlay(&self) -> Settings {
        Settings {
            command: self.command.clone(),
            mode: self.mode,
            shell: self.shell.clone(),
            format_command: self.format_command.clone(),
            max_file_size: None,
            target: TargetSettings {
                type_name: self.type_name.clone(),
                field_name: self.field_name.clone(),
                ..TargetSettings::default()
            },
        }
    }
}
