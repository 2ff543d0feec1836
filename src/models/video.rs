//! Video-generation request, job and wire shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Model identifier sent with every video task.
pub const VIDEO_MODEL: &str = "kling";

/// Task type for plain generation from a reference image.
pub const VIDEO_TASK_TYPE: &str = "video_generation";

/// Clip length in seconds used unless the caller overrides it.
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Negative prompt applied unless the caller overrides it.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, distorted faces, extra limbs, bad anatomy, \
deformed expressions, unnatural lighting, pixelated, artifacts, watermark, low resolution, \
unnatural poses, awkward body positioning, stiff motion, unrealistic skin.";

/// Quality tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoMode {
    #[default]
    Std,
    Pro,
}

impl FromStr for VideoMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "std" => Ok(Self::Std),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown mode '{}', expected std or pro", other)),
        }
    }
}

/// Vendor model version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.5")]
    V1_5,
    #[default]
    #[serde(rename = "1.6")]
    V1_6,
}

impl ModelVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(Self::V1_0),
            "1.5" => Ok(Self::V1_5),
            "1.6" => Ok(Self::V1_6),
            other => Err(format!(
                "unknown version '{}', expected 1.0, 1.5 or 1.6",
                other
            )),
        }
    }
}

/// A video generation request as collected from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoGenerationRequest {
    pub prompt: String,
    /// Public URL of an already-uploaded reference image
    pub image_url: String,
    pub duration: u32,
    pub mode: VideoMode,
    pub version: ModelVersion,
    pub negative_prompt: String,
}

impl VideoGenerationRequest {
    /// Request with the default duration, mode, version and negative prompt.
    pub fn new(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_url: image_url.into(),
            duration: DEFAULT_DURATION_SECS,
            mode: VideoMode::default(),
            version: ModelVersion::default(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
        }
    }

    /// Body for `POST /api/v1/task`.
    pub fn to_payload(&self) -> VideoTaskPayload {
        VideoTaskPayload {
            model: VIDEO_MODEL.to_string(),
            input: VideoTaskInput {
                duration: self.duration,
                mode: self.mode,
                prompt: self.prompt.clone(),
                elements: vec![VideoElement {
                    image_url: self.image_url.clone(),
                }],
                negative_prompt: self.negative_prompt.clone(),
                version: self.version,
            },
            task_type: VIDEO_TASK_TYPE.to_string(),
        }
    }
}

/// Wire body of a task submission.
#[derive(Debug, Clone, Serialize)]
pub struct VideoTaskPayload {
    pub model: String,
    pub input: VideoTaskInput,
    pub task_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoTaskInput {
    pub duration: u32,
    pub mode: VideoMode,
    pub prompt: String,
    pub elements: Vec<VideoElement>,
    pub negative_prompt: String,
    pub version: ModelVersion,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoElement {
    pub image_url: String,
}

/// Envelope returned by both task endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskEnvelope {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<TaskData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskData {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<TaskOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub works: Vec<TaskWork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskWork {
    #[serde(default)]
    pub cover: Option<WorkResource>,
    #[serde(default)]
    pub video: Option<WorkResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkResource {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub resource_without_watermark: Option<String>,
}

/// Job lifecycle as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Completed,
    Failed,
}

impl JobState {
    /// Map a vendor status string. Anything other than `completed` or
    /// `failed` (`pending`, `processing`, `staged`, ...) is still pending.
    pub fn from_vendor(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Media produced by a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoOutput {
    pub video_url: String,
    pub cover_url: Option<String>,
}

/// One status observation of a generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub task_id: String,
    pub state: JobState,
    /// Present only when the first work carries a watermark-free video
    pub output: Option<VideoOutput>,
}

impl GenerationJob {
    /// Interpret a status envelope for `task_id`.
    pub fn from_envelope(task_id: &str, envelope: TaskEnvelope) -> Self {
        let data = envelope.data.unwrap_or_default();
        let state = data
            .status
            .as_deref()
            .map(JobState::from_vendor)
            .unwrap_or(JobState::Pending);

        let first_work = data
            .output
            .and_then(|output| output.works.into_iter().next());

        let output = first_work.and_then(|work| {
            let video_url = work.video.and_then(|v| v.resource_without_watermark)?;
            Some(VideoOutput {
                video_url,
                cover_url: work.cover.and_then(|c| c.resource_without_watermark),
            })
        });

        Self {
            task_id: data.task_id.unwrap_or_else(|| task_id.to_string()),
            state,
            output,
        }
    }
}
