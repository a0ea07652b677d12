//! HTTP Repository Implementation
//!
//! `reqwest` implementation of the 3DS transport repository. Requests are
//! never retried; any non-2xx status, network failure or undecodable body
//! is reported as `TransportError::InvalidResponse`.

use platform::client::{build_http_client, sibling_endpoint};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::application::config::{DEFAULT_CONFIG_PATH, FlowConfig};
use crate::domain::entities::{AuthenticationRequest, AuthenticationStatus, ThreeDSConfig};
use crate::domain::repository::ThreeDSRepository;
use crate::error::{TransportError, TransportResult};
use crate::infra::dto::{AuthResponse, AuthenticationBody, ConfigResponse};

const JSON: &str = "application/json";

/// HTTP-backed 3DS repository
#[derive(Debug, Clone)]
pub struct HttpThreeDSRepository {
    client: reqwest::Client,
    config_path: String,
}

impl HttpThreeDSRepository {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            config_path: DEFAULT_CONFIG_PATH.to_string(),
        }
    }

    /// Build with a client configured from `config`
    pub fn from_config(config: &FlowConfig) -> TransportResult<Self> {
        let client = build_http_client(&config.http_client())
            .map_err(|e| TransportError::InvalidResponse(format!("client setup: {}", e)))?;
        Ok(Self::new(client).with_config_path(config.config_path.clone()))
    }

    pub fn with_config_path(mut self, config_path: impl Into<String>) -> Self {
        self.config_path = config_path.into();
        self
    }

    /// Config endpoint belonging to `authorize_url`
    pub fn config_url(&self, authorize_url: &Url) -> TransportResult<Url> {
        sibling_endpoint(authorize_url, &self.config_path)
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))
    }
}

impl ThreeDSRepository for HttpThreeDSRepository {
    async fn fetch_config(&self, authorize_url: &Url) -> TransportResult<ThreeDSConfig> {
        let url = self.config_url(authorize_url)?;
        tracing::debug!(url = %url, "Fetching 3DS config");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .send()
            .await
            .map_err(request_failed)?;

        let dto: ConfigResponse = decode(response).await?;
        tracing::debug!(
            scheme = %dto.id,
            directory_server_id = %dto.directory_server_id,
            message_version = %dto.message_version,
            "3DS config fetched"
        );
        Ok(dto.into())
    }

    async fn perform_authentication(
        &self,
        authorize_url: &Url,
        request: &AuthenticationRequest,
    ) -> TransportResult<AuthenticationStatus> {
        let body = AuthenticationBody::from(request);
        tracing::debug!(
            url = %authorize_url,
            sdk_transaction_id = %request.sdk_transaction_id,
            "Sending 3DS authentication request"
        );

        let response = self
            .client
            .post(authorize_url.clone())
            .header(ACCEPT, JSON)
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let dto: AuthResponse = decode(response).await?;
        tracing::debug!(status = %dto.status, "3DS authentication response received");
        Ok(dto.into_status(&request.sdk_transaction_id))
    }
}

fn request_failed(err: reqwest::Error) -> TransportError {
    TransportError::InvalidResponse(format!("request failed: {}", err))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> TransportResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::InvalidResponse(format!("HTTP {}", status)));
    }

    let bytes = response.bytes().await.map_err(request_failed)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TransportError::InvalidResponse(format!("decode failed: {}", e)))
}
