//! Translation status cache and report diagnostics for Kleio source trees.
//!
//! # Module Structure
//!
//! | Module        | Purpose                                              |
//! |---------------|------------------------------------------------------|
//! | `cache`       | Status records, directory closure, fetch memo        |
//! | `diagnostics` | `.rpt` report parsing and per-document sets          |
//! | `service`     | `StatusClient` seam and the JSON-RPC Kleio client    |
//! | `tree`        | Status-annotated directory listings                  |
//! | `format`      | Group-level indentation of Kleio sources             |
//! | `watch`       | Report watcher                                       |
//! | `config`      | `kleio.toml` and Kleio home discovery                |
//! | `cli`         | `kleio` subcommands                                  |

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod format;
pub mod logger;
pub mod service;
pub mod tree;
pub mod watch;
