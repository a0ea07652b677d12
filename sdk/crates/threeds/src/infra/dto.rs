//! Wire DTOs for the 3DS endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{
    AuthenticationRequest, AuthenticationStatus, ChallengeData, ThreeDSConfig,
};

/// Device type reported to the authentication endpoint
pub const DEVICE_TYPE: &str = "iOS";

pub const MISSING_ARES: &str = "challenge_missing_ares";
pub const INCOMPLETE_ARES: &str = "challenge_incomplete_ares";

// ============================================================================
// Config endpoint
// ============================================================================

/// Response of the config endpoint. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigResponse {
    pub id: String,
    #[serde(default)]
    pub device_info_encryption_alg: Option<String>,
    #[serde(default)]
    pub device_info_encryption_enc: Option<String>,
    pub device_info_encryption_cert_pem: String,
    pub directory_server_id: String,
    pub key: String,
    pub message_version: String,
}

impl From<ConfigResponse> for ThreeDSConfig {
    fn from(dto: ConfigResponse) -> Self {
        Self {
            id: dto.id,
            directory_server_id: dto.directory_server_id,
            encrypted_key: dto.key,
            message_version: dto.message_version,
            device_info_encryption_cert_pem: dto.device_info_encryption_cert_pem,
            device_info_encryption_alg: dto.device_info_encryption_alg,
            device_info_encryption_enc: dto.device_info_encryption_enc,
        }
    }
}

// ============================================================================
// Authentication endpoint
// ============================================================================

/// Authentication request body
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationBody {
    pub areq: AReq,
    pub encrypted_device_info: String,
    pub device_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AReq {
    #[serde(rename = "sdkAppID")]
    pub sdk_app_id: String,
    #[serde(rename = "sdkEphemPubKey")]
    pub sdk_ephem_pub_key: Value,
    #[serde(rename = "sdkMaxTimeout")]
    pub sdk_max_timeout: u32,
    #[serde(rename = "sdkTransID")]
    pub sdk_trans_id: String,
}

impl From<&AuthenticationRequest> for AuthenticationBody {
    fn from(request: &AuthenticationRequest) -> Self {
        Self {
            areq: AReq {
                sdk_app_id: request.sdk_app_id.clone(),
                sdk_ephem_pub_key: ephemeral_key_value(&request.sdk_ephemeral_public_key),
                sdk_max_timeout: request.max_timeout_minutes,
                sdk_trans_id: request.sdk_transaction_id.clone(),
            },
            encrypted_device_info: request.encrypted_device_info.clone(),
            device_type: DEVICE_TYPE,
        }
    }
}

/// Embed a JWK as a JSON object; anything else goes out as a plain string
fn ephemeral_key_value(key: &str) -> Value {
    match serde_json::from_str::<Value>(key) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::String(key.to_string()),
    }
}

/// Authentication response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    #[serde(default)]
    pub ares: Option<ARes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ARes {
    #[serde(rename = "threeDSServerTransID", default)]
    pub three_ds_server_trans_id: Option<String>,
    #[serde(rename = "acsTransID", default)]
    pub acs_trans_id: Option<String>,
    #[serde(rename = "acsSignedContent", default)]
    pub acs_signed_content: Option<String>,
    #[serde(rename = "acsUIType", default)]
    pub acs_ui_type: Option<String>,
    #[serde(rename = "acsReferenceNumber", default)]
    pub acs_reference_number: Option<String>,
    #[serde(rename = "sdkTransID", default)]
    pub sdk_trans_id: Option<String>,
}

impl AuthResponse {
    /// Decode into the domain status
    ///
    /// `request_sdk_transaction_id` fills in a missing `ares.sdkTransID`.
    pub fn into_status(self, request_sdk_transaction_id: &str) -> AuthenticationStatus {
        match self.status.as_str() {
            "success" => AuthenticationStatus::Success,
            "failed" => AuthenticationStatus::Failed,
            "challenge" => match self.ares {
                None => AuthenticationStatus::Unknown(MISSING_ARES.to_string()),
                Some(ares) => ares
                    .into_challenge(request_sdk_transaction_id)
                    .map(AuthenticationStatus::Challenge)
                    .unwrap_or_else(|| AuthenticationStatus::Unknown(INCOMPLETE_ARES.to_string())),
            },
            _ => AuthenticationStatus::Unknown(self.status),
        }
    }
}

impl ARes {
    fn into_challenge(self, request_sdk_transaction_id: &str) -> Option<ChallengeData> {
        Some(ChallengeData {
            server_transaction_id: self.three_ds_server_trans_id?,
            acs_transaction_id: self.acs_trans_id?,
            acs_signed_content: self.acs_signed_content,
            acs_reference_number: self.acs_reference_number,
            sdk_transaction_id: self
                .sdk_trans_id
                .unwrap_or_else(|| request_sdk_transaction_id.to_string()),
        })
    }
}
