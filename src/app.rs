//! Application context shared by every studio action.
//!
//! Owns the credential gate and the vendor clients. Every action except
//! login and logout requires an active session.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::auth::CredentialGate;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{
    FaceSwapRequest, FaceSwapResult, GenerationResult, ImageGenerationRequest, InlineImage,
    UploadSource, UploadedAsset, VideoGenerationRequest, VideoOutput,
};
use crate::services::http::build_client;
use crate::services::polling::{PollState, TaskPoller};
use crate::services::{FaceSwapClient, ImageGenerationClient, Storage, VideoGenerationClient};

/// Application context.
pub struct Studio {
    config: Config,
    gate: CredentialGate,
    video: Arc<VideoGenerationClient>,
    image: ImageGenerationClient,
    faceswap: FaceSwapClient,
}

impl Studio {
    /// Build the context from configuration and restore the persisted session.
    pub fn new(config: Config) -> AppResult<Self> {
        let http = build_client(config.http_timeout)?;

        let gate = CredentialGate::from_settings(&config.gate);
        let video = Arc::new(VideoGenerationClient::new(http.clone(), &config.video));
        let image = ImageGenerationClient::new(http.clone(), &config.image);
        let faceswap = FaceSwapClient::new(http, &config.faceswap);

        Ok(Self {
            config,
            gate,
            video,
            image,
            faceswap,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gate(&self) -> &CredentialGate {
        &self.gate
    }

    pub fn login(&mut self, username: &str, password: &str) -> AppResult<()> {
        self.gate.authenticate(username, password)
    }

    pub fn logout(&mut self) -> AppResult<()> {
        self.gate.deauthenticate()
    }

    /// Upload a local reference image and return its public URL.
    pub async fn upload(&self, path: &Path) -> AppResult<UploadedAsset> {
        self.gate.require_authenticated()?;
        let source = UploadSource::from_path(path)?;
        let storage = Storage::new(&self.config.s3)?;
        storage.upload(&source).await
    }

    /// Submit a video task and poll it to a terminal state.
    ///
    /// `on_submitted` sees the task id as soon as the vendor returns it.
    pub async fn generate_video(
        &self,
        request: &VideoGenerationRequest,
        cancel: &CancellationToken,
        on_submitted: impl FnOnce(&str),
    ) -> AppResult<VideoOutput> {
        self.gate.require_authenticated()?;

        let task_id = self.video.submit(request).await?;
        on_submitted(&task_id);

        let poller = TaskPoller::new(Arc::clone(&self.video), self.config.poll_interval);
        let state = poller.run(&task_id, cancel).await;
        if matches!(state, PollState::Cancelled) {
            warn!(%task_id, "Stopped polling; the vendor task keeps running");
        }
        state.into_result()
    }

    /// Generate images from a prompt and a local reference image.
    pub async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> AppResult<GenerationResult> {
        self.gate.require_authenticated()?;
        let result = self.image.generate(request).await?;
        info!(count = result.image_urls.len(), "Images generated");
        Ok(result)
    }

    /// Swap faces between two local images.
    pub async fn swap_faces(&self, source: &Path, target: &Path) -> AppResult<FaceSwapResult> {
        self.gate.require_authenticated()?;
        let request = FaceSwapRequest {
            source_image: InlineImage::read(source).await?.base64(),
            target_image: InlineImage::read(target).await?.base64(),
        };
        self.faceswap.swap(&request).await
    }
}
