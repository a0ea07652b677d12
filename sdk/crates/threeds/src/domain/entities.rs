//! Domain Entities
//!
//! Core types of one 3DS authentication attempt.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// Maximum time (minutes) the ACS may take, sent in every authentication request
pub const MAX_TIMEOUT_MINUTES: u32 = 5;

/// Directory-server configuration for one authentication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreeDSConfig {
    /// Scheme identifier, used as the engine scheme name
    pub id: String,
    pub directory_server_id: String,
    /// Base64 of `iv (16 bytes) || AES-256-CTR ciphertext` of the engine API key
    pub encrypted_key: String,
    pub message_version: String,
    /// PEM certificate used for device-info encryption and as trust root
    pub device_info_encryption_cert_pem: String,
    pub device_info_encryption_alg: Option<String>,
    pub device_info_encryption_enc: Option<String>,
}

/// A live vendor-engine transaction
///
/// `H` is the engine's own transaction handle. The coordinator never
/// inspects it; it only hands the session back to the adapter that made it.
#[derive(Debug)]
pub struct EngineSession<H> {
    handle: H,
    pub sdk_transaction_id: String,
    pub sdk_app_id: String,
    pub sdk_ephemeral_public_key: String,
    /// Encrypted device fingerprint
    pub device_info: String,
}

impl<H> EngineSession<H> {
    pub fn new(
        handle: H,
        sdk_transaction_id: String,
        sdk_app_id: String,
        sdk_ephemeral_public_key: String,
        device_info: String,
    ) -> Self {
        Self {
            handle,
            sdk_transaction_id,
            sdk_app_id,
            sdk_ephemeral_public_key,
            device_info,
        }
    }

    /// Engine transaction handle
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Build the authentication request for this session
    pub fn authentication_request(&self) -> AuthenticationRequest {
        AuthenticationRequest {
            sdk_transaction_id: self.sdk_transaction_id.clone(),
            sdk_app_id: self.sdk_app_id.clone(),
            sdk_ephemeral_public_key: self.sdk_ephemeral_public_key.clone(),
            max_timeout_minutes: MAX_TIMEOUT_MINUTES,
            encrypted_device_info: self.device_info.clone(),
        }
    }
}

/// Outbound authentication payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationRequest {
    pub sdk_transaction_id: String,
    pub sdk_app_id: String,
    pub sdk_ephemeral_public_key: String,
    pub max_timeout_minutes: u32,
    pub encrypted_device_info: String,
}

/// Parameters for the interactive challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeData {
    pub server_transaction_id: String,
    pub acs_transaction_id: String,
    pub acs_signed_content: Option<String>,
    pub acs_reference_number: Option<String>,
    pub sdk_transaction_id: String,
}

/// Server verdict on an authentication request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationStatus {
    /// Frictionless success
    Success,
    /// Cardholder must complete a challenge
    Challenge(ChallengeData),
    Failed,
    /// Unrecognized or incomplete status, raw value kept for diagnostics
    Unknown(String),
}

/// Terminal outcome of a flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowResult {
    Completed,
    Cancelled,
    Failed(String),
}

impl FlowResult {
    pub fn failed(reason: impl Into<String>) -> Self {
        FlowResult::Failed(reason.into())
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, FlowResult::Completed)
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            FlowResult::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Convert to a unified result for callers that prefer `Result`
    ///
    /// `Cancelled` and `Failed` stay distinguishable through the error kind.
    pub fn into_app_result(self) -> AppResult<()> {
        match self {
            FlowResult::Completed => Ok(()),
            FlowResult::Cancelled => Err(AppError::cancelled("Authentication cancelled")),
            FlowResult::Failed(reason) => Err(AppError::authentication_failed(reason)),
        }
    }
}

impl fmt::Display for FlowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowResult::Completed => write!(f, "completed"),
            FlowResult::Cancelled => write!(f, "cancelled"),
            FlowResult::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Observable flow progress
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    LoadingConfig,
    StartingSdk,
    Authenticating,
    Challenging,
    Completed(FlowResult),
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Completed(_))
    }

    /// Terminal result, if reached
    pub fn result(&self) -> Option<&FlowResult> {
        match self {
            FlowState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::LoadingConfig => "loading_config",
            FlowState::StartingSdk => "starting_sdk",
            FlowState::Authenticating => "authenticating",
            FlowState::Challenging => "challenging",
            FlowState::Completed(_) => "completed",
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
