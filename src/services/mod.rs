//! Vendor clients, storage and the task polling loop.

pub mod faceswap;
pub mod http;
pub mod image;
pub mod polling;
pub mod storage;
pub mod video;

pub use faceswap::FaceSwapClient;
pub use image::ImageGenerationClient;
pub use polling::{PollHandle, PollState, TaskPoller, TaskStatusSource};
pub use storage::Storage;
pub use video::VideoGenerationClient;
