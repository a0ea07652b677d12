//! Flow Coordinator
//!
//! Drives one authentication attempt:
//! `Idle → LoadingConfig → StartingSdk → Authenticating → [Challenging] → Completed`.
//! Every failure along the way ends the flow with a `FlowResult::Failed`.
//! A coordinator is meant for a single attempt; create a new one per flow.

use std::sync::Arc;

use kernel::id::FlowId;
use tokio::sync::watch;
use url::Url;

use crate::domain::engine::SdkService;
use crate::domain::entities::{AuthenticationStatus, FlowResult, FlowState};
use crate::domain::repository::ThreeDSRepository;
use crate::domain::ui_customization::UiCustomization;
use crate::domain::value_objects::PresentationContext;

pub const CONFIG_UNAVAILABLE: &str = "Config unavailable";
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Input of one authentication flow
#[derive(Debug, Clone)]
pub struct FlowRequest {
    /// Server-issued authorize URL of the payment
    pub authorize_url: Url,
    /// Host app deep link the ACS returns to
    pub return_url: Option<String>,
    pub ui_customization: Option<UiCustomization>,
    pub presentation_context: PresentationContext,
}

impl FlowRequest {
    pub fn new(authorize_url: Url, presentation_context: PresentationContext) -> Self {
        Self {
            authorize_url,
            return_url: None,
            ui_customization: None,
            presentation_context,
        }
    }

    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = Some(return_url.into());
        self
    }

    pub fn with_ui_customization(mut self, ui_customization: UiCustomization) -> Self {
        self.ui_customization = Some(ui_customization);
        self
    }
}

/// Flow Coordinator
pub struct FlowCoordinator<R, S>
where
    R: ThreeDSRepository,
    S: SdkService,
{
    repository: Arc<R>,
    sdk_service: Arc<S>,
    flow_id: FlowId,
    state: Arc<watch::Sender<FlowState>>,
}

impl<R, S> FlowCoordinator<R, S>
where
    R: ThreeDSRepository,
    S: SdkService,
{
    pub fn new(repository: Arc<R>, sdk_service: Arc<S>) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            repository,
            sdk_service,
            flow_id: FlowId::new(),
            state: Arc::new(state),
        }
    }

    /// Publish state changes into an existing channel instead of a private one
    pub fn with_state_sink(mut self, state: Arc<watch::Sender<FlowState>>) -> Self {
        self.state = state;
        self
    }

    pub fn flow_id(&self) -> FlowId {
        self.flow_id
    }

    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    /// Run the flow to its terminal result
    pub async fn run(&self, request: FlowRequest) -> FlowResult {
        tracing::info!(
            flow_id = %self.flow_id,
            authorize_url = %request.authorize_url,
            "3DS flow started"
        );

        let result = self.drive(&request).await;
        self.transition(FlowState::Completed(result.clone()));

        match &result {
            FlowResult::Failed(reason) => {
                tracing::warn!(flow_id = %self.flow_id, reason = %reason, "3DS flow failed");
            }
            _ => {
                tracing::info!(flow_id = %self.flow_id, result = %result, "3DS flow finished");
            }
        }
        result
    }

    /// Forward a deep link to the engine adapter
    ///
    /// Accepted in any state and does not change the flow state.
    pub fn handle_deep_link(&self, url: &Url) -> bool {
        let handled = self.sdk_service.open_deep_link(url);
        tracing::debug!(flow_id = %self.flow_id, handled, "Deep link forwarded");
        handled
    }

    async fn drive(&self, request: &FlowRequest) -> FlowResult {
        self.transition(FlowState::LoadingConfig);
        let config = match self.repository.fetch_config(&request.authorize_url).await {
            Ok(config) => config,
            Err(e) => {
                e.log();
                return FlowResult::failed(CONFIG_UNAVAILABLE);
            }
        };

        self.transition(FlowState::StartingSdk);
        let session = match self
            .sdk_service
            .begin_session(&config, request.ui_customization.as_ref())
        {
            Ok(session) => session,
            Err(e) => {
                e.log();
                return FlowResult::Failed(format!("SDK start failed: {}", e));
            }
        };
        tracing::debug!(
            flow_id = %self.flow_id,
            sdk_transaction_id = %session.sdk_transaction_id,
            "Engine session ready"
        );

        self.transition(FlowState::Authenticating);
        let auth_request = session.authentication_request();
        let status = match self
            .repository
            .perform_authentication(&request.authorize_url, &auth_request)
            .await
        {
            Ok(status) => status,
            Err(e) => {
                e.log();
                return FlowResult::Failed(format!("Auth failed: {}", e));
            }
        };

        match status {
            AuthenticationStatus::Success => FlowResult::Completed,
            AuthenticationStatus::Failed => FlowResult::failed(AUTHENTICATION_FAILED),
            AuthenticationStatus::Unknown(status) => {
                FlowResult::Failed(format!("Unknown authentication status: {}", status))
            }
            AuthenticationStatus::Challenge(challenge) => {
                self.transition(FlowState::Challenging);
                tracing::info!(
                    flow_id = %self.flow_id,
                    server_transaction_id = %challenge.server_transaction_id,
                    acs_transaction_id = %challenge.acs_transaction_id,
                    "Challenge required"
                );
                self.sdk_service
                    .perform_challenge(
                        &session,
                        &challenge,
                        request.return_url.as_deref(),
                        &request.presentation_context,
                    )
                    .await
            }
        }
    }

    fn transition(&self, next: FlowState) {
        let previous = self.state.send_replace(next.clone());
        tracing::debug!(
            flow_id = %self.flow_id,
            from = %previous,
            to = %next,
            "3DS flow state changed"
        );
    }
}
