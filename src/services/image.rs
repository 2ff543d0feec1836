//! Image-generation vendor client.
//!
//! Success has two layers: the HTTP status must be 2xx, and the body's
//! `base_resp.status_code` must be 0. A 2xx body with any other code is a
//! business failure carrying the vendor's status message.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ImageApiSettings;
use crate::error::{AppError, AppResult};
use crate::models::image::{ImageGenerationResponse, STATUS_OK};
use crate::models::{GenerationResult, ImageGenerationRequest};
use crate::services::http::{self, string_at};

const VENDOR: &str = "image";

/// Shown when the request itself fails.
pub const REQUEST_FALLBACK: &str = "Failed to generate images. Please try again.";

/// Shown when the vendor reports a failure without a message.
pub const BUSINESS_FALLBACK: &str = "Failed to generate images";

/// Extract a display message from an image vendor error body.
pub fn image_error_message(body: &Value) -> Option<String> {
    string_at(body, &["base_resp", "status_msg"])
        .or_else(|| string_at(body, &["error", "message"]))
        .or_else(|| string_at(body, &["message"]))
}

/// Apply the business-level success rule to a decoded 2xx body.
pub fn interpret_response(response: ImageGenerationResponse) -> AppResult<GenerationResult> {
    let base = response.base_resp;
    let urls = response.data.and_then(|data| data.image_urls);

    match urls {
        Some(image_urls) if base.status_code == STATUS_OK => Ok(GenerationResult {
            image_urls,
            status_code: base.status_code,
            status_msg: base.status_msg,
        }),
        _ => {
            let message = if base.status_msg.is_empty() {
                BUSINESS_FALLBACK.to_string()
            } else {
                base.status_msg
            };
            Err(AppError::VendorBusiness {
                code: base.status_code,
                message,
            })
        }
    }
}

/// HTTP client for the image generation API.
#[derive(Clone)]
pub struct ImageGenerationClient {
    client: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl ImageGenerationClient {
    pub fn new(client: reqwest::Client, settings: &ImageApiSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
        }
    }

    /// Generate images synchronously and return their URLs.
    pub async fn generate(&self, request: &ImageGenerationRequest) -> AppResult<GenerationResult> {
        let builder = self
            .client
            .post(format!("{}/v1/image_generation", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .json(&request.to_payload());

        let response: ImageGenerationResponse = http::send(builder, VENDOR, REQUEST_FALLBACK)
            .await?
            .ensure_success(VENDOR, REQUEST_FALLBACK, image_error_message)?
            .decode(VENDOR, REQUEST_FALLBACK)?;

        if let Some(metadata) = &response.metadata {
            info!(
                id = response.id.as_deref().unwrap_or_default(),
                success_count = metadata.success_count.as_deref().unwrap_or_default(),
                failed_count = metadata.failed_count.as_deref().unwrap_or_default(),
                "Image generation finished"
            );
        }

        interpret_response(response).inspect_err(|e| {
            warn!(vendor = VENDOR, code = e.code(), message = %e, "Image generation rejected");
        })
    }
}
