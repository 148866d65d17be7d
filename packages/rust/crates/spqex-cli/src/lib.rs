#![allow(clippy::doc_markdown)]

//! spqex-cli - settings and run wiring for the `spqex` binary
//!
//! # Architecture
//!
//! ```text
//! spqex-cli/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── settings.rs # YAML settings (system + user merge)
//! ├── run.rs      # Discovery + orchestration for one root
//! ├── cli.rs      # clap flags (binary only)
//! └── main.rs     # Entry point, tracing setup, exit code
//! ```

mod run;
mod settings;

pub use run::{RunRequest, run};
pub use settings::{
    Settings, TargetSettings, load_settings, load_settings_from_paths, set_config_home_override,
    settings_paths,
};
