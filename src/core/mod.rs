//! Core types - pure abstractions shared across the codebase.

pub mod path;
mod state;
mod status;

pub use state::{is_shutdown, request_shutdown, setup_shutdown_handler, wait_shutdown};
pub use status::{StatusCode, UnknownStatus};
