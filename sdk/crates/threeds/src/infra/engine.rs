//! Vendor Engine Adapter
//!
//! Implements the [`SdkService`] port on top of a [`ThreeDSEngine`]. Owns
//! the active-challenge guard, so every flow sharing one adapter also shares
//! the single challenge slot.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::application::challenge_guard::{ActiveChallengeGuard, ChallengeLease};
use crate::application::config::{CHALLENGE_TIMEOUT_MINUTES, FlowConfig};
use crate::application::config_provider::{ConfigProvider, DefaultConfigProvider};
use crate::domain::engine::{
    ChallengeParameters, ChallengeStatusReceiver, EngineTransaction, SdkService, ThreeDSEngine,
};
use crate::domain::entities::{ChallengeData, EngineSession, FlowResult, ThreeDSConfig};
use crate::domain::services::{map_challenge_event, requestor_app_url};
use crate::domain::ui_customization::UiCustomization;
use crate::domain::value_objects::{EngineConfiguration, PresentationContext};
use crate::error::{EngineError, EngineResult};

pub const CHALLENGE_IN_PROGRESS: &str = "Another challenge is already in progress";

/// Engine-backed SDK service
pub struct EngineSdkService<E, P = DefaultConfigProvider>
where
    E: ThreeDSEngine,
    P: ConfigProvider,
{
    engine: Arc<E>,
    config_provider: P,
    guard: ActiveChallengeGuard<E::Transaction>,
    challenge_deadline: Duration,
}

impl<E, P> EngineSdkService<E, P>
where
    E: ThreeDSEngine,
    P: ConfigProvider,
{
    pub fn new(engine: Arc<E>, config_provider: P) -> Self {
        Self {
            engine,
            config_provider,
            guard: ActiveChallengeGuard::new(),
            challenge_deadline: FlowConfig::default().challenge_deadline(),
        }
    }

    /// How long to wait for the engine to report an outcome before giving up
    pub fn with_challenge_deadline(mut self, deadline: Duration) -> Self {
        self.challenge_deadline = deadline;
        self
    }

    /// Whether a challenge currently occupies the slot
    pub fn is_challenge_active(&self) -> bool {
        self.guard.is_active()
    }

    fn engine_configuration(&self, config: &ThreeDSConfig) -> EngineResult<EngineConfiguration> {
        let api_key = self.config_provider.api_key(config).map_err(|e| {
            e.log();
            EngineError::from(e)
        })?;

        Ok(EngineConfiguration {
            schemes: self.config_provider.scheme(config).into_iter().collect(),
            api_key: api_key.into(),
            log_level: self.config_provider.log_level(),
            locale: self.config_provider.locale().map(str::to_string),
        })
    }
}

impl<E, P> SdkService for EngineSdkService<E, P>
where
    E: ThreeDSEngine,
    P: ConfigProvider,
{
    type Handle = Arc<E::Transaction>;

    fn begin_session(
        &self,
        config: &ThreeDSConfig,
        ui_customization: Option<&UiCustomization>,
    ) -> EngineResult<EngineSession<Self::Handle>> {
        if let Some(ui) = ui_customization {
            ui.validate()
                .map_err(|e| EngineError::SessionCreationFailed(e.to_string()))?;
        }

        let configuration = self.engine_configuration(config)?;
        self.engine
            .initialize(configuration, ui_customization)
            .map_err(|e| EngineError::SessionCreationFailed(e.message))?;

        let transaction = self
            .engine
            .create_transaction(&config.directory_server_id, &config.message_version)
            .map_err(|e| EngineError::SessionCreationFailed(e.message))?;
        let parameters = transaction
            .authentication_parameters()
            .map_err(|e| EngineError::SessionCreationFailed(e.message))?;

        tracing::info!(
            sdk_transaction_id = %parameters.sdk_transaction_id,
            directory_server_id = %config.directory_server_id,
            message_version = %config.message_version,
            "3DS engine transaction created"
        );

        Ok(EngineSession::new(
            Arc::new(transaction),
            parameters.sdk_transaction_id,
            parameters.sdk_app_id,
            parameters.sdk_ephemeral_public_key,
            parameters.device_data,
        ))
    }

    async fn perform_challenge(
        &self,
        session: &EngineSession<Self::Handle>,
        challenge: &ChallengeData,
        return_url: Option<&str>,
        context: &PresentationContext,
    ) -> FlowResult {
        let transaction = Arc::clone(session.handle());
        let (receiver, events) = ChallengeStatusReceiver::channel();

        let Some(lease) =
            ChallengeLease::acquire(&self.guard, Arc::clone(&transaction), receiver.clone())
        else {
            tracing::warn!(
                sdk_transaction_id = %session.sdk_transaction_id,
                "Challenge rejected, another challenge is active"
            );
            return FlowResult::failed(CHALLENGE_IN_PROGRESS);
        };

        let parameters = ChallengeParameters {
            server_transaction_id: challenge.server_transaction_id.clone(),
            acs_transaction_id: challenge.acs_transaction_id.clone(),
            acs_reference_number: challenge.acs_reference_number.clone(),
            acs_signed_content: challenge.acs_signed_content.clone(),
            requestor_app_url: requestor_app_url(return_url, &challenge.server_transaction_id),
        };
        tracing::debug!(
            sdk_transaction_id = %session.sdk_transaction_id,
            requestor_app_url = ?parameters.requestor_app_url,
            "Starting challenge"
        );

        if let Err(e) =
            transaction.do_challenge(parameters, receiver, CHALLENGE_TIMEOUT_MINUTES, context)
        {
            lease.release();
            let error = EngineError::ChallengeInvocationFailed(e.message.clone());
            error.log();
            return FlowResult::Failed(e.message);
        }

        // An outcome the engine already reported wins over dismissal and the deadline.
        let result = tokio::select! {
            biased;

            event = events => match event {
                Ok(event) => {
                    tracing::debug!(?event, "Challenge event received");
                    map_challenge_event(event)
                }
                // The slot holds a sender until release, so this is unreachable in practice.
                Err(_) => FlowResult::Cancelled,
            },
            () = context.dismissed() => {
                tracing::info!(
                    sdk_transaction_id = %session.sdk_transaction_id,
                    "Presentation dismissed, cancelling challenge"
                );
                FlowResult::Cancelled
            }
            () = tokio::time::sleep(self.challenge_deadline) => {
                tracing::warn!(
                    sdk_transaction_id = %session.sdk_transaction_id,
                    deadline_secs = self.challenge_deadline.as_secs(),
                    "Engine reported no challenge outcome before the deadline"
                );
                FlowResult::Cancelled
            }
        };

        lease.release();
        tracing::info!(
            sdk_transaction_id = %session.sdk_transaction_id,
            result = %result,
            "Challenge finished"
        );
        result
    }

    fn open_deep_link(&self, url: &Url) -> bool {
        if !self.guard.is_active() {
            tracing::debug!(url = %url, "Deep link ignored, no active transaction");
            return false;
        }
        self.engine.handle_app_url(url)
    }
}
