//! JSON-RPC 2.0 client for the Kleio translation server.
//!
//! ```text
//! POST <url>/json/
//! {"jsonrpc":"2.0","method":"translations_get",
//!  "params":{"path":"/sources/demo","recurse":"yes","token":"…"},"id":1}
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ServiceError, StatusClient};
use crate::cache::StatusRecord;
use crate::core::StatusCode;

/// Raw result of `translations_translate` (shape varies across servers).
pub type TranslateResponse = serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Kleio server connection.
pub struct KleioClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct Request<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct GetParams<'a> {
    path: &'a str,
    recurse: &'static str,
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<StatusCode>,
}

#[derive(Serialize)]
struct TranslateParams<'a> {
    path: &'a str,
    spawn: &'static str,
    token: Option<&'a str>,
}

impl KleioClient {
    /// Client for the server at `url` (e.g. `http://localhost:8088`), posting
    /// to `rpc_path` (e.g. `/json/`).
    pub fn new(url: &str, rpc_path: &str, token: Option<String>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: join_endpoint(url, rpc_path),
            token,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `translations_get`: status records under `path`, recursively.
    pub async fn translations_get(
        &self,
        path: &str,
        status: Option<StatusCode>,
    ) -> Result<Vec<StatusRecord>, ServiceError> {
        let params = GetParams {
            path,
            recurse: "yes",
            token: self.token.as_deref(),
            status,
        };
        self.call("translations_get", params).await
    }

    /// `translations_translate`: start translating a file or directory.
    pub async fn translations_translate(
        &self,
        path: &str,
    ) -> Result<TranslateResponse, ServiceError> {
        let params = TranslateParams {
            path,
            spawn: "no",
            token: self.token.as_deref(),
        };
        self.call("translations_translate", params).await
    }

    async fn call<P, T>(&self, method: &str, params: P) -> Result<T, ServiceError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        crate::debug!("rpc"; "{} #{} -> {}", method, id, self.endpoint);

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Protocol(format!("HTTP {status}")));
        }

        let body: Response<T> = response.json().await?;
        match (body.result, body.error) {
            (_, Some(err)) => Err(ServiceError::Remote {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ServiceError::Protocol(format!(
                "{method}: response has neither result nor error"
            ))),
        }
    }
}

impl StatusClient for KleioClient {
    async fn get(
        &self,
        path: &str,
        status: Option<StatusCode>,
    ) -> Result<Vec<StatusRecord>, ServiceError> {
        self.translations_get(path, status).await
    }
}

fn join_endpoint(url: &str, rpc_path: &str) -> String {
    format!(
        "{}/{}",
        url.trim_end_matches('/'),
        rpc_path.trim_start_matches('/')
    )
}
