//! Video-generation vendor client.
//!
//! Submission returns only a task id; results are read back through the
//! status endpoint, which is a pure read and safe to call repeatedly.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::info;

use crate::config::{VIDEO_API_KEY_HEADER, VideoApiSettings};
use crate::error::{AppError, AppResult};
use crate::models::video::TaskEnvelope;
use crate::models::{GenerationJob, VideoGenerationRequest};
use crate::services::http::{self, string_at};
use crate::services::polling::TaskStatusSource;

const VENDOR: &str = "video";

pub const SUBMIT_FALLBACK: &str = "Failed to generate video. Please try again.";
pub const STATUS_FALLBACK: &str = "Failed to check task status. Please try again.";

/// Extract a display message from a video vendor error body.
///
/// Looks at `data.error.message`, `error.message`, a string `error`, then
/// the top-level `message`.
pub fn video_error_message(body: &Value) -> Option<String> {
    string_at(body, &["data", "error", "message"])
        .or_else(|| string_at(body, &["error", "message"]))
        .or_else(|| string_at(body, &["error"]))
        .or_else(|| string_at(body, &["message"]))
}

/// HTTP client for the video task API.
#[derive(Clone)]
pub struct VideoGenerationClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl VideoGenerationClient {
    pub fn new(client: reqwest::Client, settings: &VideoApiSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Submit a generation task and return its id.
    pub async fn submit(&self, request: &VideoGenerationRequest) -> AppResult<String> {
        let payload = request.to_payload();
        let builder = self
            .client
            .post(format!("{}/api/v1/task", self.base_url))
            .header(VIDEO_API_KEY_HEADER, self.api_key.expose_secret())
            .json(&payload);

        let reply = http::send(builder, VENDOR, SUBMIT_FALLBACK)
            .await?
            .ensure_success(VENDOR, SUBMIT_FALLBACK, video_error_message)?;
        let status = reply.status.as_u16();
        let envelope: TaskEnvelope = reply.decode(VENDOR, SUBMIT_FALLBACK)?;

        // A 2xx body without a task id still names the response status
        let task_id = envelope
            .data
            .and_then(|data| data.task_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Transport {
                status: Some(status),
                message: envelope
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SUBMIT_FALLBACK.to_string()),
            })?;

        info!(task_id = %task_id, mode = ?request.mode, version = %request.version, "Video task submitted");
        Ok(task_id)
    }

    /// Fetch the current status of a task.
    pub async fn get_status(&self, task_id: &str) -> AppResult<GenerationJob> {
        let builder = self
            .client
            .get(format!(
                "{}/api/v1/task/{}",
                self.base_url,
                urlencoding::encode(task_id)
            ))
            .header(VIDEO_API_KEY_HEADER, self.api_key.expose_secret());

        let envelope: TaskEnvelope = http::send(builder, VENDOR, STATUS_FALLBACK)
            .await?
            .ensure_success(VENDOR, STATUS_FALLBACK, video_error_message)?
            .decode(VENDOR, STATUS_FALLBACK)?;

        Ok(GenerationJob::from_envelope(task_id, envelope))
    }
}

#[async_trait]
impl TaskStatusSource for VideoGenerationClient {
    async fn fetch_status(&self, task_id: &str) -> AppResult<GenerationJob> {
        self.get_status(task_id).await
    }
}
