//! Configuration section definitions.
//!
//! | Module        | TOML Section     | Purpose                              |
//! |---------------|------------------|--------------------------------------|
//! | `server`      | `[server]`       | Kleio server endpoint, token, homes  |
//! | `diagnostics` | `[diagnostics]`  | Report lookup and line anchoring     |
//! | `watch`       | `[watch]`        | Report watcher                       |

mod diagnostics;
mod server;
mod watch;

pub use diagnostics::DiagnosticsConfig;
pub use server::{DEFAULT_SERVER_URL, ServerConfig};
pub use watch::WatchConfig;
