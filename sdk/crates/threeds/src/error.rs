//! 3DS Error Types
//!
//! Errors for each concern of the authentication core. Every enum maps to
//! a `kernel::error::kind::ErrorKind` and converts into the unified
//! `kernel::error::app_error::AppError`.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::crypto::CipherError;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type TransportResult<T> = Result<T, TransportError>;
pub type EngineResult<T> = Result<T, EngineError>;

/// API key recovery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Encrypted key is not base64 or too short to hold an IV and ciphertext
    #[error("Invalid API key encoding")]
    InvalidKeyEncoding,

    /// Decrypted key is not valid UTF-8
    #[error("Decrypted API key is invalid")]
    ApiKeyInvalid,

    /// Cipher could not be set up
    #[error("Crypto error: {0}")]
    Crypto(#[from] CipherError),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Crypto
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ConfigError::Crypto(e) => {
                tracing::error!(error = %e, "3DS API key cipher setup failed");
            }
            _ => {
                tracing::warn!(error = %self, "3DS API key recovery failed");
            }
        }
    }
}

/// Transport repository errors
///
/// Non-2xx responses, network failures and undecodable bodies all surface
/// as `InvalidResponse`; the detail is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::InvalidResponse(_) => ErrorKind::Transport,
            TransportError::InvalidUrl(_) => ErrorKind::InvalidInput,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            TransportError::InvalidResponse(detail) => {
                tracing::warn!(detail = %detail, "3DS endpoint returned an invalid response");
            }
            TransportError::InvalidUrl(url) => {
                tracing::error!(url = %url, "3DS endpoint URL is unusable");
            }
        }
    }
}

/// Vendor engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Session creation failed: {0}")]
    SessionCreationFailed(String),

    #[error("Challenge invocation failed: {0}")]
    ChallengeInvocationFailed(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Engine
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        tracing::error!(error = %self, "3DS engine error");
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::SessionCreationFailed(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message).with_source(err)
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message).with_source(err)
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message).with_source(err)
    }
}
