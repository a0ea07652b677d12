//! Shared fakes for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use platform::crypto::{seal_aes256_ctr, sha512, to_base64};
use threeds::domain::entities::{AuthenticationRequest, AuthenticationStatus, ThreeDSConfig};
use threeds::domain::repository::ThreeDSRepository;
use threeds::domain::value_objects::{EngineConfiguration, Scheme};
use threeds::engine::{
    AuthParameters, ChallengeParameters, ChallengeStatusReceiver, EngineFailure,
    EngineTransaction, ThreeDSEngine,
};
use threeds::error::{TransportError, TransportResult};
use threeds::models::{PresentationContext, UiCustomization};
use url::Url;

pub const DIRECTORY_SERVER_ID: &str = "A000000003";
pub const API_KEY: &str = "pkey_test_5wvisbxphp1zapg8ie6";
pub const CERT_PEM: &str =
    "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIU\nQUJDREVGRw==\n-----END CERTIFICATE-----\n";

/// Config whose `encrypted_key` decrypts to [`API_KEY`]
pub fn sealed_config() -> ThreeDSConfig {
    let digest = sha512(DIRECTORY_SERVER_ID.as_bytes());
    let sealed = seal_aes256_ctr(&digest[..32], API_KEY.as_bytes()).unwrap();

    ThreeDSConfig {
        id: "visa".to_string(),
        directory_server_id: DIRECTORY_SERVER_ID.to_string(),
        encrypted_key: to_base64(&sealed),
        message_version: "2.2.0".to_string(),
        device_info_encryption_cert_pem: CERT_PEM.to_string(),
        device_info_encryption_alg: Some("RSA-OAEP-256".to_string()),
        device_info_encryption_enc: Some("A128CBC-HS256".to_string()),
    }
}

pub fn authorize_url(base: &str) -> Url {
    Url::parse(&format!("{}/payments/pay_test_1/authorize", base)).unwrap()
}

/// Route flow logs to the test output
pub fn init_logging() {
    platform::telemetry::init_tracing("threeds=debug");
}

/// Poll `condition` until it holds or five seconds pass
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

// ============================================================================
// Fake vendor engine
// ============================================================================

/// What the fake engine does when a challenge starts
#[derive(Debug, Clone)]
pub enum ChallengeScript {
    Complete(&'static str),
    Cancel,
    TimeOut,
    ProtocolError(Option<&'static str>),
    RuntimeError(Option<&'static str>),
    /// `do_challenge` itself fails
    Throw(&'static str),
    /// Keep the receiver for the test to resolve later
    Hold,
}

#[derive(Debug, Default)]
pub struct EngineLog {
    pub initialized: usize,
    pub api_keys: Vec<String>,
    pub schemes: Vec<Scheme>,
    pub locales: Vec<Option<String>>,
    pub challenges: Vec<ChallengeParameters>,
    pub deep_links: Vec<String>,
    pub held: Option<ChallengeStatusReceiver>,
}

pub struct FakeEngine {
    script: Mutex<ChallengeScript>,
    log: Arc<Mutex<EngineLog>>,
    transactions: AtomicUsize,
}

impl FakeEngine {
    pub fn new(script: ChallengeScript) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            log: Arc::new(Mutex::new(EngineLog::default())),
            transactions: AtomicUsize::new(0),
        })
    }

    pub fn log(&self) -> MutexGuard<'_, EngineLog> {
        self.log.lock().unwrap()
    }

    pub fn set_script(&self, script: ChallengeScript) {
        *self.script.lock().unwrap() = script;
    }

    /// Receiver of a challenge started with [`ChallengeScript::Hold`]
    pub fn held(&self) -> Option<ChallengeStatusReceiver> {
        self.log().held.clone()
    }
}

pub struct FakeTransaction {
    id: String,
    script: ChallengeScript,
    log: Arc<Mutex<EngineLog>>,
}

impl ThreeDSEngine for FakeEngine {
    type Transaction = FakeTransaction;

    fn initialize(
        &self,
        configuration: EngineConfiguration,
        _ui_customization: Option<&UiCustomization>,
    ) -> Result<(), EngineFailure> {
        let mut log = self.log();
        log.initialized += 1;
        log.api_keys.push(configuration.api_key.expose().to_string());
        log.schemes.extend(configuration.schemes);
        log.locales.push(configuration.locale);
        Ok(())
    }

    fn create_transaction(
        &self,
        directory_server_id: &str,
        _message_version: &str,
    ) -> Result<FakeTransaction, EngineFailure> {
        if directory_server_id.is_empty() {
            return Err(EngineFailure::new("unknown directory server"));
        }
        let n = self.transactions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(FakeTransaction {
            id: format!("sdk-trans-{}", n),
            script: self.script.lock().unwrap().clone(),
            log: Arc::clone(&self.log),
        })
    }

    fn handle_app_url(&self, url: &Url) -> bool {
        self.log().deep_links.push(url.to_string());
        true
    }
}

impl EngineTransaction for FakeTransaction {
    fn authentication_parameters(&self) -> Result<AuthParameters, EngineFailure> {
        Ok(AuthParameters {
            sdk_transaction_id: self.id.clone(),
            sdk_app_id: "app-1".to_string(),
            sdk_ephemeral_public_key: r#"{"kty":"EC","crv":"P-256","x":"a","y":"b"}"#.to_string(),
            device_data: "encrypted-device-data".to_string(),
        })
    }

    fn do_challenge(
        &self,
        parameters: ChallengeParameters,
        receiver: ChallengeStatusReceiver,
        _timeout_minutes: u32,
        _context: &PresentationContext,
    ) -> Result<(), EngineFailure> {
        self.log.lock().unwrap().challenges.push(parameters);
        match self.script {
            ChallengeScript::Complete(status) => {
                receiver.completed(status);
            }
            ChallengeScript::Cancel => {
                receiver.cancelled();
            }
            ChallengeScript::TimeOut => {
                receiver.timed_out();
            }
            ChallengeScript::ProtocolError(message) => {
                receiver.protocol_error(message.map(str::to_string));
            }
            ChallengeScript::RuntimeError(message) => {
                receiver.runtime_error(message.map(str::to_string));
            }
            ChallengeScript::Throw(message) => return Err(EngineFailure::new(message)),
            ChallengeScript::Hold => {
                self.log.lock().unwrap().held = Some(receiver);
            }
        }
        Ok(())
    }
}

// ============================================================================
// In-memory repository
// ============================================================================

pub struct StubRepository {
    config: TransportResult<ThreeDSConfig>,
    status: TransportResult<AuthenticationStatus>,
    pub config_fetches: AtomicUsize,
    pub requests: Mutex<Vec<AuthenticationRequest>>,
}

impl StubRepository {
    pub fn new(status: AuthenticationStatus) -> Self {
        Self {
            config: Ok(sealed_config()),
            status: Ok(status),
            config_fetches: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_config(mut self, config: TransportResult<ThreeDSConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_status(mut self, status: TransportResult<AuthenticationStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn failing_config() -> Self {
        Self::new(AuthenticationStatus::Success)
            .with_config(Err(TransportError::InvalidResponse("HTTP 500".to_string())))
    }
}

impl ThreeDSRepository for StubRepository {
    async fn fetch_config(&self, _authorize_url: &Url) -> TransportResult<ThreeDSConfig> {
        self.config_fetches.fetch_add(1, Ordering::SeqCst);
        self.config.clone()
    }

    async fn perform_authentication(
        &self,
        _authorize_url: &Url,
        request: &AuthenticationRequest,
    ) -> TransportResult<AuthenticationStatus> {
        self.requests.lock().unwrap().push(request.clone());
        self.status.clone()
    }
}
