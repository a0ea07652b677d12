//! Vendor Engine Capabilities
//!
//! The vendor 3DS engine is opaque. These traits describe the capabilities
//! the core needs from it; a host wires in an implementation backed by the
//! real vendor SDK. [`SdkService`] is the port the coordinator talks to.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;
use url::Url;

use crate::domain::entities::{ChallengeData, EngineSession, FlowResult, ThreeDSConfig};
use crate::domain::ui_customization::UiCustomization;
use crate::domain::value_objects::{EngineConfiguration, PresentationContext};
use crate::error::EngineResult;

/// Failure reported by the vendor engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFailure {
    pub message: String,
}

impl EngineFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Authentication parameters produced by an engine transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParameters {
    pub sdk_transaction_id: String,
    pub sdk_app_id: String,
    pub sdk_ephemeral_public_key: String,
    /// Encrypted device data
    pub device_data: String,
}

/// Parameters handed to the engine to run a challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeParameters {
    pub server_transaction_id: String,
    pub acs_transaction_id: String,
    pub acs_reference_number: Option<String>,
    pub acs_signed_content: Option<String>,
    /// Deep link the ACS / OOB app uses to return to the host app
    pub requestor_app_url: Option<String>,
}

/// Raw challenge outcome as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeEvent {
    Completed { transaction_status: String },
    Cancelled,
    TimedOut,
    ProtocolError { message: Option<String> },
    RuntimeError { message: Option<String> },
}

/// Callback sink the engine reports the challenge outcome to
///
/// Cheap to clone and callable from any thread. Only the first event is
/// delivered; later calls return `false`.
#[derive(Debug, Clone)]
pub struct ChallengeStatusReceiver {
    sender: Arc<Mutex<Option<oneshot::Sender<ChallengeEvent>>>>,
}

impl ChallengeStatusReceiver {
    /// Create a receiver and the future-side end of its channel
    pub fn channel() -> (Self, oneshot::Receiver<ChallengeEvent>) {
        let (sender, events) = oneshot::channel();
        let receiver = Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        };
        (receiver, events)
    }

    pub fn completed(&self, transaction_status: impl Into<String>) -> bool {
        self.deliver(ChallengeEvent::Completed {
            transaction_status: transaction_status.into(),
        })
    }

    pub fn cancelled(&self) -> bool {
        self.deliver(ChallengeEvent::Cancelled)
    }

    pub fn timed_out(&self) -> bool {
        self.deliver(ChallengeEvent::TimedOut)
    }

    pub fn protocol_error(&self, message: Option<String>) -> bool {
        self.deliver(ChallengeEvent::ProtocolError { message })
    }

    pub fn runtime_error(&self, message: Option<String>) -> bool {
        self.deliver(ChallengeEvent::RuntimeError { message })
    }

    /// Deliver `event` if no event has been delivered yet
    pub fn deliver(&self, event: ChallengeEvent) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(sender) => sender.send(event).is_ok(),
            None => {
                tracing::debug!(?event, "Ignoring challenge event after the first one");
                false
            }
        }
    }

    /// Whether an event has already been delivered
    pub fn is_resolved(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Vendor 3DS engine
pub trait ThreeDSEngine: Send + Sync + 'static {
    type Transaction: EngineTransaction;

    /// Initialize (or re-initialize) the engine for a session
    fn initialize(
        &self,
        configuration: EngineConfiguration,
        ui_customization: Option<&UiCustomization>,
    ) -> Result<(), EngineFailure>;

    fn create_transaction(
        &self,
        directory_server_id: &str,
        message_version: &str,
    ) -> Result<Self::Transaction, EngineFailure>;

    /// Offer a deep link to the running challenge. Returns whether it was consumed.
    fn handle_app_url(&self, url: &Url) -> bool;
}

/// One vendor engine transaction
pub trait EngineTransaction: Send + Sync + 'static {
    fn authentication_parameters(&self) -> Result<AuthParameters, EngineFailure>;

    /// Start the challenge UI. The outcome arrives later on `receiver`.
    fn do_challenge(
        &self,
        parameters: ChallengeParameters,
        receiver: ChallengeStatusReceiver,
        timeout_minutes: u32,
        context: &PresentationContext,
    ) -> Result<(), EngineFailure>;
}

/// Port over the vendor engine used by the flow coordinator
#[trait_variant::make(SdkService: Send)]
pub trait LocalSdkService {
    /// Opaque session handle, passed back untouched
    type Handle: Send + Sync;

    /// Initialize the engine with `config` and open a transaction
    fn begin_session(
        &self,
        config: &ThreeDSConfig,
        ui_customization: Option<&UiCustomization>,
    ) -> EngineResult<EngineSession<Self::Handle>>;

    /// Run the challenge to a terminal result
    async fn perform_challenge(
        &self,
        session: &EngineSession<Self::Handle>,
        challenge: &ChallengeData,
        return_url: Option<&str>,
        context: &PresentationContext,
    ) -> FlowResult;

    /// Forward a deep link to the active challenge, if any
    fn open_deep_link(&self, url: &Url) -> bool;
}
