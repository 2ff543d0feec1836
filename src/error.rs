//! Domain error types for the studio client.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! Every variant's Display output is a display-ready message: raw transport
//! errors are logged where they happen and never carried across this boundary.

use std::fmt;

use crate::config::ConfigError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Credential mismatch at the gate, or an action attempted without a session
    #[error("{0}")]
    Auth(String),

    /// Network failure or non-2xx response from a vendor
    #[error("{message}")]
    Transport {
        /// HTTP status, when a response was received at all
        status: Option<u16>,
        message: String,
    },

    /// 2xx response whose body encodes a vendor-level failure
    #[error("{message}")]
    VendorBusiness { code: i64, message: String },

    /// Object storage operation failed
    #[error("{0}")]
    Upload(String),

    /// Status fetch failed while a job was outstanding
    #[error("{0}")]
    Polling(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing the persisted session failed
    #[error("Session storage error: {0}")]
    Session(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Credential mismatch with the canonical message.
    pub fn invalid_credentials() -> Self {
        AppError::Auth("Invalid credentials".to_string())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Transport { .. } => "TRANSPORT_ERROR",
            AppError::VendorBusiness { .. } => "VENDOR_ERROR",
            AppError::Upload(_) => "UPLOAD_ERROR",
            AppError::Polling(_) => "POLLING_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Render as the machine-readable error body.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Machine-readable error body printed by `--json` output.
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
