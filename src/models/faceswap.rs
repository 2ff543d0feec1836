//! Face-swap request and result shapes.

use serde::{Deserialize, Serialize};

/// Two inline images, each raw base64 without a `data:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceSwapRequest {
    #[serde(rename = "SourceImageBase64Data")]
    pub source_image: String,
    #[serde(rename = "TargetImageBase64Data")]
    pub target_image: String,
}

/// Successful vendor body.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceSwapResponse {
    #[serde(rename = "ResultImageUrl", default)]
    pub result_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceSwapResult {
    pub result_url: String,
}
