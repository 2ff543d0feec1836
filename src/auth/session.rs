//! Persisted authentication flag.
//!
//! The session is a single boolean written to a small JSON file. There is
//! no token, no expiry and no notion of which user logged in.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Authenticated flag as stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub authenticated: bool,
}

/// Location of the persisted session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session.
    ///
    /// A missing, unreadable or malformed file reads as "not authenticated".
    pub fn load(&self) -> AuthSession {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return AuthSession::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return AuthSession::default();
            }
        };

        match serde_json::from_str::<AuthSession>(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring malformed session file");
                AuthSession::default()
            }
        }
    }

    /// Persist the session, creating parent directories as needed.
    pub fn save(&self, session: AuthSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Session(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_string(&session)
            .map_err(|e| AppError::Session(format!("Failed to encode session: {}", e)))?;
        std::fs::write(&self.path, body).map_err(|e| {
            AppError::Session(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    /// Remove the persisted session. A file that is already gone is not an error.
    pub fn clear(&self) -> AppResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Session(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
