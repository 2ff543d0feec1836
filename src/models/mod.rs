//! Request/response records exchanged with the vendor clients.
//!
//! All records are transient: built per call and dropped afterwards. The
//! only identity that outlives a round trip is the video task id.

pub mod asset;
pub mod faceswap;
pub mod image;
pub mod video;

pub use asset::{InlineImage, UploadSource, UploadedAsset};
pub use faceswap::{FaceSwapRequest, FaceSwapResult};
pub use image::{AspectRatio, GenerationResult, ImageGenerationRequest};
pub use video::{
    GenerationJob, JobState, ModelVersion, VideoGenerationRequest, VideoMode, VideoOutput,
};
