//! Shared HTTP plumbing for the vendor clients.
//!
//! Every vendor call goes through [`send`], which turns network failures into
//! a display-ready [`AppError::Transport`] and hands back the status plus the
//! body parsed as JSON when possible. Vendor-specific error extraction stays
//! in each client.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::defaults;
use crate::error::{AppError, AppResult};

/// Build an HTTP client with connect and total timeouts.
pub fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(defaults::HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::InvalidInput(format!("Failed to build HTTP client: {}", e)))
}

/// Status and body of a vendor response.
#[derive(Debug)]
pub struct VendorReply {
    pub status: StatusCode,
    /// `None` when the body was empty or not JSON
    pub body: Option<Value>,
}

impl VendorReply {
    /// Fail with a transport error unless the status is 2xx.
    ///
    /// `extract` pulls a vendor message out of the error body; `fallback`
    /// is used when it finds nothing.
    pub fn ensure_success(
        self,
        vendor: &str,
        fallback: &str,
        extract: impl Fn(&Value) -> Option<String>,
    ) -> AppResult<Self> {
        if self.status.is_success() {
            return Ok(self);
        }

        let message = self
            .body
            .as_ref()
            .and_then(extract)
            .unwrap_or_else(|| fallback.to_string());
        warn!(vendor, status = self.status.as_u16(), %message, "Vendor request failed");

        Err(AppError::Transport {
            status: Some(self.status.as_u16()),
            message,
        })
    }

    /// Decode the body into `T`, failing with `fallback` when it does not fit.
    pub fn decode<T: DeserializeOwned>(self, vendor: &str, fallback: &str) -> AppResult<T> {
        let status = self.status.as_u16();
        let body = self.body.unwrap_or(Value::Null);
        serde_json::from_value(body).map_err(|e| {
            warn!(vendor, status, error = %e, "Unexpected vendor response body");
            AppError::Transport {
                status: Some(status),
                message: fallback.to_string(),
            }
        })
    }
}

/// Send a request, converting transport failures into `fallback`.
pub async fn send(request: RequestBuilder, vendor: &str, fallback: &str) -> AppResult<VendorReply> {
    let response = request.send().await.map_err(|e| {
        warn!(vendor, error = %e, "Vendor request did not complete");
        AppError::Transport {
            status: None,
            message: fallback.to_string(),
        }
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        warn!(vendor, status = status.as_u16(), error = %e, "Failed to read vendor response");
        AppError::Transport {
            status: Some(status.as_u16()),
            message: fallback.to_string(),
        }
    })?;

    debug!(vendor, status = status.as_u16(), bytes = text.len(), "Vendor response received");

    Ok(VendorReply {
        status,
        body: serde_json::from_str(&text).ok(),
    })
}

/// String at a nested object path, ignoring empty strings.
pub fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    current
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
