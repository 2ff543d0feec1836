//! Face-swap vendor client.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::info;

use crate::config::{FaceSwapSettings, RAPIDAPI_HOST_HEADER, RAPIDAPI_KEY_HEADER};
use crate::error::{AppError, AppResult};
use crate::models::faceswap::FaceSwapResponse;
use crate::models::{FaceSwapRequest, FaceSwapResult};
use crate::services::http::{self, string_at};

const VENDOR: &str = "faceswap";

pub const FACESWAP_FALLBACK: &str = "Failed to perform face swap";

/// Extract a display message from a face-swap error body.
///
/// An `Errors` map of field -> messages is flattened into one
/// space-separated string in field order, then array order. Without it,
/// `Message` or `message` is used.
pub fn faceswap_error_message(body: &Value) -> Option<String> {
    if let Some(errors) = body.get("Errors").and_then(Value::as_object) {
        let parts: Vec<String> = errors
            .values()
            .flat_map(|value| match value {
                Value::Array(items) => items.iter().map(render_part).collect::<Vec<_>>(),
                other => vec![render_part(other)],
            })
            .collect();
        let joined = parts.join(" ");
        if !joined.trim().is_empty() {
            return Some(joined);
        }
    }

    string_at(body, &["Message"]).or_else(|| string_at(body, &["message"]))
}

fn render_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTTP client for the face-swap API.
#[derive(Clone)]
pub struct FaceSwapClient {
    client: reqwest::Client,
    base_url: String,
    host: String,
    api_key: SecretString,
}

impl FaceSwapClient {
    pub fn new(client: reqwest::Client, settings: &FaceSwapSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            host: settings.host.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Swap the face from the source image onto the target image.
    pub async fn swap(&self, request: &FaceSwapRequest) -> AppResult<FaceSwapResult> {
        let builder = self
            .client
            .post(format!("{}/faceswapbase64", self.base_url))
            .header(RAPIDAPI_KEY_HEADER, self.api_key.expose_secret())
            .header(RAPIDAPI_HOST_HEADER, &self.host)
            .json(request);

        let reply = http::send(builder, VENDOR, FACESWAP_FALLBACK)
            .await?
            .ensure_success(VENDOR, FACESWAP_FALLBACK, faceswap_error_message)?;

        // A 2xx body without a result URL may still carry vendor errors
        let status = reply.status.as_u16();
        let detail = reply.body.as_ref().and_then(faceswap_error_message);
        let response: FaceSwapResponse = reply.decode(VENDOR, FACESWAP_FALLBACK)?;

        match response.result_image_url.filter(|url| !url.is_empty()) {
            Some(result_url) => {
                info!(%result_url, "Face swap completed");
                Ok(FaceSwapResult { result_url })
            }
            None => Err(AppError::Transport {
                status: Some(status),
                message: detail.unwrap_or_else(|| FACESWAP_FALLBACK.to_string()),
            }),
        }
    }
}
