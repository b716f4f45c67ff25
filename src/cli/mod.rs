//! Command-line interface module.

mod args;
pub mod common;
pub mod diagnostics;
pub mod format;
pub mod status;
pub mod translate;
pub mod tree;
pub mod watch;

pub use args::{Cli, Commands, DiagnosticsArgs, FormatArgs, StatusArgs, TreeArgs};

use anyhow::Result;

/// Dispatch a parsed command against the installed config.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = crate::config::cfg();
    match &cli.command {
        Commands::Status { args } => status::run_status(args, &config).await,
        Commands::Tree { args } => tree::run_tree(args, &config).await,
        Commands::Diagnostics { args } => diagnostics::run_diagnostics(args, &config).await,
        Commands::Translate { path } => translate::run_translate(path, &config).await,
        Commands::Format { args } => format::run_format(args, &config),
        Commands::Watch { path } => watch::run_watch(path.as_deref(), &config).await,
    }
}
