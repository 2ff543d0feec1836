//! Image-generation request, result and wire shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Model identifier sent with every image request.
pub const IMAGE_MODEL: &str = "image-01";

/// Vendor business status meaning success.
pub const STATUS_OK: i64 = 0;

pub const DEFAULT_IMAGE_COUNT: u8 = 2;

/// Output aspect ratios accepted by the vendor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:2")]
    Photo,
    #[serde(rename = "2:3")]
    PhotoPortrait,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "21:9")]
    Cinema,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 8] = [
        Self::Square,
        Self::Wide,
        Self::Landscape,
        Self::Photo,
        Self::PhotoPortrait,
        Self::Portrait,
        Self::Tall,
        Self::Cinema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Wide => "16:9",
            Self::Landscape => "4:3",
            Self::Photo => "3:2",
            Self::PhotoPortrait => "2:3",
            Self::Portrait => "3:4",
            Self::Tall => "9:16",
            Self::Cinema => "21:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|r| r.as_str()).collect();
                format!(
                    "unknown aspect ratio '{}', expected one of {}",
                    s,
                    allowed.join(", ")
                )
            })
    }
}

/// An image generation request as collected from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    /// Reference image as a `data:` URL
    pub reference_image: String,
    pub aspect_ratio: AspectRatio,
    /// Number of images; bounded by the caller, passed through as-is
    pub n: u8,
    pub prompt_optimizer: bool,
}

impl ImageGenerationRequest {
    pub fn to_payload(&self) -> ImageGenerationPayload {
        ImageGenerationPayload {
            model: IMAGE_MODEL.to_string(),
            prompt: self.prompt.clone(),
            subject_reference: vec![SubjectReference {
                kind: "character".to_string(),
                image_file: self.reference_image.clone(),
            }],
            aspect_ratio: self.aspect_ratio,
            response_format: "url".to_string(),
            n: self.n,
            prompt_optimizer: self.prompt_optimizer,
        }
    }
}

/// Wire body of `POST /v1/image_generation`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationPayload {
    pub model: String,
    pub prompt: String,
    pub subject_reference: Vec<SubjectReference>,
    pub aspect_ratio: AspectRatio,
    pub response_format: String,
    pub n: u8,
    pub prompt_optimizer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub image_file: String,
}

/// Wire body returned by the image vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Option<ImageData>,
    #[serde(default)]
    pub metadata: Option<ImageMetadata>,
    pub base_resp: BaseResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageMetadata {
    #[serde(default)]
    pub failed_count: Option<String>,
    #[serde(default)]
    pub success_count: Option<String>,
}

/// Business-level status embedded in a 2xx body.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseResponse {
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: String,
}

/// Outcome of a successful image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Result URLs in vendor order
    pub image_urls: Vec<String>,
    pub status_code: i64,
    pub status_msg: String,
}
