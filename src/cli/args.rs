//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::StatusCode;

/// Kleio translation status and report diagnostics
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the working directory
    #[arg(short = 'C', long, global = true, default_value = "kleio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show translation status of files under a path
    #[command(visible_alias = "s")]
    Status {
        #[command(flatten)]
        args: StatusArgs,
    },

    /// Show the workspace tree annotated with translation status
    #[command(visible_alias = "t")]
    Tree {
        #[command(flatten)]
        args: TreeArgs,
    },

    /// Extract diagnostics from the translation reports of source files
    #[command(visible_alias = "d")]
    Diagnostics {
        #[command(flatten)]
        args: DiagnosticsArgs,
    },

    /// Ask the Kleio server to translate a file or directory
    Translate {
        /// File or directory to translate
        #[arg(value_hint = clap::ValueHint::AnyPath)]
        path: PathBuf,
    },

    /// Re-indent Kleio source files by group level
    #[command(visible_alias = "f")]
    Format {
        #[command(flatten)]
        args: FormatArgs,
    },

    /// Watch reports and refresh diagnostics and status as translations finish
    #[command(visible_alias = "w")]
    Watch {
        /// Directory to watch (default: workspace root)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        path: Option<PathBuf>,
    },
}

/// Status command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct StatusArgs {
    /// File or directory (default: workspace root)
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    pub path: Option<PathBuf>,

    /// Only show files with this status (E, V, W, T, P, I, Q)
    #[arg(short, long)]
    pub status: Option<StatusCode>,

    /// Print records as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Tree command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TreeArgs {
    /// Directory to list (default: workspace root)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Only show files with this status and directories containing them
    #[arg(short, long)]
    pub status: Option<StatusCode>,

    /// Maximum depth to descend (0 = only the directory itself)
    #[arg(short, long, default_value_t = usize::MAX, hide_default_value = true)]
    pub depth: usize,
}

/// Diagnostics command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct DiagnosticsArgs {
    /// Source files (their reports are looked up next to them)
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub paths: Vec<PathBuf>,

    /// Print diagnostics as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Format command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct FormatArgs {
    /// Source files or directories to format
    #[arg(required = true, value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Only report files that would change; fail if any would
    #[arg(long)]
    pub check: bool,
}
