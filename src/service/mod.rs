//! Access to the remote Kleio translation service.
//!
//! [`StatusClient`] is the seam the status cache depends on; [`KleioClient`]
//! is the JSON-RPC implementation used by the CLI. Tests substitute a fake.

mod error;
mod rpc;

use std::future::Future;

pub use error::{FailureKind, ServiceError};
pub use rpc::{KleioClient, TranslateResponse};

use crate::cache::StatusRecord;
use crate::core::StatusCode;

/// Retrieves translation status records for a path, recursively.
pub trait StatusClient: Send + Sync {
    /// Fetch every record under `path` (already in the server's path
    /// convention), optionally restricted to one status.
    fn get(
        &self,
        path: &str,
        status: Option<StatusCode>,
    ) -> impl Future<Output = Result<Vec<StatusRecord>, ServiceError>> + Send;
}
