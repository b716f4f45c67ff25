//! `kleio` - Kleio translation status from the command line.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use kleio_status::cli::{self, Cli};
use kleio_status::config::{KleioConfig, init_config};
use kleio_status::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    init_config(KleioConfig::load(&cli.config, &cwd)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(cli::run(&cli))
}
