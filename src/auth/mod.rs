//! Credential gate guarding every studio action.
//!
//! Compares a username/password pair against the configured expected values
//! and persists a single authenticated flag. Sessions never expire and
//! failed attempts are not counted.

pub mod session;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::config::GateSettings;
use crate::error::{AppError, AppResult};

pub use session::{AuthSession, SessionFile};

/// Expected login credentials.
///
/// Both values are held as `SecretString`, so `Debug` never prints them.
#[derive(Clone)]
pub struct ExpectedCredentials {
    username: SecretString,
    password: SecretString,
}

impl ExpectedCredentials {
    pub fn new(username: SecretString, password: SecretString) -> Self {
        Self { username, password }
    }

    /// Byte-for-byte comparison of both fields.
    ///
    /// Uses `subtle::ConstantTimeEq`; both fields are always compared so the
    /// result does not reveal which one differed.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self
            .username
            .expose_secret()
            .as_bytes()
            .ct_eq(username.as_bytes());
        let pass_ok = self
            .password
            .expose_secret()
            .as_bytes()
            .ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for ExpectedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExpectedCredentials([REDACTED])")
    }
}

/// Owner of the session state.
///
/// The flag is only mutated through [`CredentialGate::authenticate`] and
/// [`CredentialGate::deauthenticate`]; everything else reads it.
#[derive(Debug)]
pub struct CredentialGate {
    expected: ExpectedCredentials,
    store: SessionFile,
    session: AuthSession,
}

impl CredentialGate {
    /// Build a gate and restore the persisted session.
    pub fn open(expected: ExpectedCredentials, store: SessionFile) -> Self {
        let session = store.load();
        Self {
            expected,
            store,
            session,
        }
    }

    /// Build a gate from configuration.
    pub fn from_settings(settings: &GateSettings) -> Self {
        Self::open(
            ExpectedCredentials::new(settings.username.clone(), settings.password.clone()),
            SessionFile::new(settings.session_path.clone()),
        )
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    pub fn session(&self) -> AuthSession {
        self.session
    }

    /// Check a credential pair. On match the flag is persisted and set; on
    /// mismatch nothing changes.
    pub fn authenticate(&mut self, username: &str, password: &str) -> AppResult<()> {
        if !self.expected.verify(username, password) {
            warn!("Login rejected: invalid credentials");
            return Err(AppError::invalid_credentials());
        }

        let session = AuthSession {
            authenticated: true,
        };
        self.store.save(session)?;
        self.session = session;

        info!("Login accepted");
        Ok(())
    }

    /// Clear the flag and the persisted session regardless of prior state.
    pub fn deauthenticate(&mut self) -> AppResult<()> {
        self.session = AuthSession::default();
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Refuse with an auth error unless a session is active.
    pub fn require_authenticated(&self) -> AppResult<()> {
        if self.session.authenticated {
            Ok(())
        } else {
            Err(AppError::Auth(
                "Not logged in. Run `genai-studio login` first".to_string(),
            ))
        }
    }
}
