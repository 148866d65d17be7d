//! spqex: lint and format SQL literals embedded in Go sources.
//!
//! ```text
//! spqex [--mode lint|fmt|diff] --cmd <command> [options] <dir>
//! ```

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use spqex_cli::{RunRequest, load_settings, run, set_config_home_override};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "spqex=debug"
        } else {
            "spqex=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = load_settings()
        .merge(cli.settings_overlay())
        .with_default_formatter();
    let request = RunRequest::from_settings(&cli.dir, &settings)?;
    tracing::debug!(
        root = %request.root.display(),
        mode = %request.mode,
        command = %request.command,
        "starting run"
    );

    let summary = run(&request, &mut std::io::stderr()).await?;
    Ok(ExitCode::from(u8::try_from(summary.exit_code).unwrap_or(1)))
}
