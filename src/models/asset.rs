//! Local files handed to the clients, and uploaded assets.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Get the content type for a file based on its extension.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(content_type_for_extension)
        .unwrap_or("application/octet-stream")
}

fn file_name_of(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidInput(format!("Not a file path: {}", path.display())))
}

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSource {
    pub path: PathBuf,
    /// Original file name, used in the object key
    pub file_name: String,
    /// Declared content type sent with the object
    pub content_type: String,
}

impl UploadSource {
    pub fn from_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let file_name = file_name_of(&path)?;
        let content_type = content_type_for_path(&path).to_string();
        Ok(Self {
            path,
            file_name,
            content_type,
        })
    }
}

/// Result of a completed upload. There is no deletion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedAsset {
    pub key: String,
    pub url: String,
}

/// Image bytes sent inline in a request body.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, inferring the content type from its extension.
    pub async fn read(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "{} is empty",
                path.display()
            )));
        }
        Ok(Self::new(content_type_for_path(path), bytes))
    }

    /// Raw standard base64, no prefix.
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:{content_type};base64,{payload}`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.base64())
    }
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
