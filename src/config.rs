//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// HTTP header carrying the video vendor key.
pub const VIDEO_API_KEY_HEADER: &str = "x-api-key";

/// HTTP headers carrying the face-swap marketplace key and host.
pub const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";
pub const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";

/// Default values used when a variable is unset.
pub mod defaults {
    pub const VIDEO_API_URL: &str = "https://api.goapi.ai";
    pub const IMAGE_API_URL: &str = "https://api.minimaxi.chat";
    pub const FACESWAP_HOST: &str = "faceswap-image-transformation-api.p.rapidapi.com";
    pub const S3_REGION: &str = "us-east-1";
    pub const SESSION_PATH: &str = ".genai-studio/session.json";
    pub const POLL_INTERVAL_SECS: u64 = 15;
    pub const HTTP_TIMEOUT_SECS: u64 = 180;
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Canonical `RUST_ENV` spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video-generation vendor settings.
#[derive(Debug, Clone)]
pub struct VideoApiSettings {
    pub base_url: String,
    pub api_key: SecretString,
}

/// Image-generation vendor settings.
#[derive(Debug, Clone)]
pub struct ImageApiSettings {
    pub base_url: String,
    pub token: SecretString,
}

/// Face-swap vendor settings.
#[derive(Debug, Clone)]
pub struct FaceSwapSettings {
    /// Base URL requests are sent to, `https://{host}` unless overridden
    pub base_url: String,
    /// Value of the `x-rapidapi-host` header
    pub host: String,
    pub api_key: SecretString,
}

/// S3 storage configuration.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 endpoint URL (for MinIO or custom S3-compatible services)
    pub endpoint: Option<String>,
    pub bucket: String,
    pub region: String,
    pub access_key: SecretString,
    pub secret_key: SecretString,
}

/// Expected login credentials for the gate.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub username: SecretString,
    pub password: SecretString,
    /// File the authenticated flag is persisted to
    pub session_path: PathBuf,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub video: VideoApiSettings,
    pub image: ImageApiSettings,
    pub faceswap: FaceSwapSettings,
    pub s3: S3Config,
    pub gate: GateSettings,
    /// Fixed interval between task status fetches
    pub poll_interval: Duration,
    /// Total timeout for a single vendor request
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode every variable has a default, credentials default
    /// to empty. In production mode vendor credentials, the bucket and the
    /// expected login credentials must all be non-empty.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production, default: development)
    /// - `GOAPI_URL` / `GOAPI_TOKEN`: video vendor base URL and key
    /// - `MINIMAXI_URL` / `MINIMAXI_TOKEN`: image vendor base URL and bearer token
    /// - `RAPIDAPI_KEY` / `RAPIDAPI_HOST`: face-swap key and host
    /// - `FACESWAP_URL`: face-swap base URL override (default: https://{RAPIDAPI_HOST})
    /// - `AWS_REGION` / `AWS_BUCKET_NAME`: object storage region and bucket
    /// - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`: object storage credentials
    /// - `S3_ENDPOINT`: custom S3-compatible endpoint
    /// - `STUDIO_USERNAME` / `STUDIO_PASSWORD`: expected login credentials
    /// - `STUDIO_SESSION_PATH`: session file (default: .genai-studio/session.json)
    /// - `STUDIO_POLL_INTERVAL_SECS`: status polling interval (default: 15)
    /// - `STUDIO_HTTP_TIMEOUT_SECS`: vendor request timeout (default: 180)
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("RUST_ENV") {
            Ok(value) => Environment::parse(&value).ok_or(ConfigError::InvalidValue(
                "RUST_ENV must be 'development' or 'production'",
            ))?,
            Err(_) => Environment::Development,
        };

        let poll_interval_secs = parse_var(
            "STUDIO_POLL_INTERVAL_SECS",
            defaults::POLL_INTERVAL_SECS,
            "STUDIO_POLL_INTERVAL_SECS must be a valid number",
        )?;
        if poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "STUDIO_POLL_INTERVAL_SECS must be greater than zero",
            ));
        }

        let http_timeout_secs = parse_var(
            "STUDIO_HTTP_TIMEOUT_SECS",
            defaults::HTTP_TIMEOUT_SECS,
            "STUDIO_HTTP_TIMEOUT_SECS must be a valid number",
        )?;

        let faceswap_host = var_or("RAPIDAPI_HOST", defaults::FACESWAP_HOST);
        let faceswap_url =
            env::var("FACESWAP_URL").unwrap_or_else(|_| format!("https://{}", faceswap_host));

        let config = Config {
            environment,
            video: VideoApiSettings {
                base_url: trim_base(var_or("GOAPI_URL", defaults::VIDEO_API_URL)),
                api_key: secret_var("GOAPI_TOKEN"),
            },
            image: ImageApiSettings {
                base_url: trim_base(var_or("MINIMAXI_URL", defaults::IMAGE_API_URL)),
                token: secret_var("MINIMAXI_TOKEN"),
            },
            faceswap: FaceSwapSettings {
                base_url: trim_base(faceswap_url),
                host: faceswap_host,
                api_key: secret_var("RAPIDAPI_KEY"),
            },
            s3: S3Config {
                endpoint: env::var("S3_ENDPOINT").ok(),
                bucket: var_or("AWS_BUCKET_NAME", ""),
                region: var_or("AWS_REGION", defaults::S3_REGION),
                access_key: secret_var("AWS_ACCESS_KEY_ID"),
                secret_key: secret_var("AWS_SECRET_ACCESS_KEY"),
            },
            gate: GateSettings {
                username: secret_var("STUDIO_USERNAME"),
                password: secret_var("STUDIO_PASSWORD"),
                session_path: PathBuf::from(var_or("STUDIO_SESSION_PATH", defaults::SESSION_PATH)),
            },
            poll_interval: Duration::from_secs(poll_interval_secs),
            http_timeout: Duration::from_secs(http_timeout_secs),
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration has every credential set.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let required = [
            ("GOAPI_TOKEN", &self.video.api_key),
            ("MINIMAXI_TOKEN", &self.image.token),
            ("RAPIDAPI_KEY", &self.faceswap.api_key),
            ("AWS_ACCESS_KEY_ID", &self.s3.access_key),
            ("AWS_SECRET_ACCESS_KEY", &self.s3.secret_key),
        ];
        for (name, value) in required {
            if value.expose_secret().is_empty() {
                errors.push(format!("{} is empty. Set the vendor credential.", name));
            }
        }

        if self.s3.bucket.is_empty() {
            errors.push("AWS_BUCKET_NAME is empty. Set the upload bucket.".to_string());
        }

        // Empty expected credentials would let an empty login through the gate
        if self.gate.username.expose_secret().is_empty()
            || self.gate.password.expose_secret().is_empty()
        {
            errors.push(
                "STUDIO_USERNAME/STUDIO_PASSWORD are empty. Set the expected login credentials."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// Names of vendor credentials carried in client-side configuration.
    ///
    /// Anyone holding this configuration can call the vendors directly.
    pub fn embedded_credentials(&self) -> Vec<&'static str> {
        [
            ("GOAPI_TOKEN", &self.video.api_key),
            ("MINIMAXI_TOKEN", &self.image.token),
            ("RAPIDAPI_KEY", &self.faceswap.api_key),
            ("AWS_SECRET_ACCESS_KEY", &self.s3.secret_key),
        ]
        .into_iter()
        .filter(|(_, value)| !value.expose_secret().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn secret_var(name: &str) -> SecretString {
    SecretString::from(env::var(name).unwrap_or_default())
}

fn parse_var(name: &str, default: u64, message: &'static str) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue(message)),
        Err(_) => Ok(default),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
