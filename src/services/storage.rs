//! S3 storage service for reference image uploads.
//!
//! Uploads raw file bytes under a time-derived key and returns the public
//! URL of the object. Supports AWS S3 and S3-compatible endpoints. The SDK's
//! retry layer is disabled: a failed upload is reported once.

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::config::S3Config;
use crate::error::{AppError, AppResult};
use crate::models::{UploadSource, UploadedAsset};

pub const UPLOAD_FALLBACK: &str = "Failed to upload image";

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    /// Create a new S3 storage client from configuration.
    pub fn new(config: &S3Config) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::Upload(
                "No upload bucket configured (AWS_BUCKET_NAME)".to_string(),
            ));
        }

        let credentials = Credentials::new(
            config.access_key.expose_secret(),
            config.secret_key.expose_secret(),
            None,
            None,
            "genai-studio",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());

        // Custom endpoints (MinIO, localstack) need path-style addressing
        if let Some(ref endpoint) = config.endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!(bucket = %config.bucket, region = %config.region, "S3 storage initialized");

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    /// Upload a local file and return its key and public URL.
    pub async fn upload(&self, source: &UploadSource) -> AppResult<UploadedAsset> {
        let key = Self::object_key(Utc::now(), &source.file_name);

        let body = ByteStream::from_path(&source.path).await.map_err(|e| {
            warn!(path = %source.path.display(), error = %e, "Failed to open upload source");
            AppError::Upload(UPLOAD_FALLBACK.to_string())
        })?;

        self.put(&key, body, &source.content_type).await?;

        let url = Self::public_url(&self.bucket, &key);
        info!(%key, %url, "Image uploaded");
        Ok(UploadedAsset { key, url })
    }

    /// Upload a byte stream to S3 under `key`.
    pub async fn put(&self, key: &str, body: ByteStream, content_type: &str) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                warn!(bucket = %self.bucket, %key, error = %DisplayErrorContext(&e), "S3 upload failed");
                AppError::Upload(UPLOAD_FALLBACK.to_string())
            })?;

        Ok(())
    }

    /// Build the object key for an upload.
    ///
    /// # Returns
    /// Key in format: {unix_millis}-{file_name}
    pub fn object_key(uploaded_at: DateTime<Utc>, file_name: &str) -> String {
        format!("{}-{}", uploaded_at.timestamp_millis(), file_name)
    }

    /// Build the public URL of an object.
    ///
    /// # Returns
    /// URL in format: https://{bucket}.s3.amazonaws.com/{key}
    pub fn public_url(bucket: &str, key: &str) -> String {
        format!(
            "https://{}.s3.amazonaws.com/{}",
            bucket,
            urlencoding::encode(key)
        )
    }
}
