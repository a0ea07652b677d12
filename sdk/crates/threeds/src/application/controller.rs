//! Flow Facade
//!
//! Public entry point for host applications. Each `start` runs a fresh
//! coordinator; the completion callback is invoked exactly once on the
//! configured runtime.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

use crate::application::config::FlowConfig;
use crate::application::config_provider::DefaultConfigProvider;
use crate::application::coordinator::{FlowCoordinator, FlowRequest};
use crate::domain::engine::{SdkService, ThreeDSEngine};
use crate::domain::entities::FlowResult;
use crate::domain::repository::ThreeDSRepository;
use crate::error::TransportResult;
use crate::infra::engine::EngineSdkService;
use crate::infra::http::HttpThreeDSRepository;

pub const NO_RUNTIME: &str = "No async runtime available";

/// 3DS flow controller
pub struct ThreeDSFlowController<R, S>
where
    R: ThreeDSRepository,
    S: SdkService,
{
    repository: Arc<R>,
    sdk_service: Arc<S>,
    callback_runtime: Option<Handle>,
}

impl<E> ThreeDSFlowController<HttpThreeDSRepository, EngineSdkService<E>>
where
    E: ThreeDSEngine,
{
    /// Production wiring: HTTP repository, default config provider, engine adapter
    pub fn from_config(config: &FlowConfig, engine: E) -> TransportResult<Self> {
        let repository = HttpThreeDSRepository::from_config(config)?;
        let provider =
            DefaultConfigProvider::new(config.engine_log_level, config.locale.clone());
        let sdk_service = EngineSdkService::new(Arc::new(engine), provider)
            .with_challenge_deadline(config.challenge_deadline());
        Ok(Self::new(repository, sdk_service))
    }
}

impl<R, S> ThreeDSFlowController<R, S>
where
    R: ThreeDSRepository + Send + Sync + 'static,
    S: SdkService + Send + Sync + 'static,
    S::Handle: 'static,
{
    pub fn new(repository: R, sdk_service: S) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(sdk_service))
    }

    /// Build from shared components, e.g. one engine adapter for several controllers
    pub fn from_shared(repository: Arc<R>, sdk_service: Arc<S>) -> Self {
        Self {
            repository,
            sdk_service,
            callback_runtime: None,
        }
    }

    /// Run flows and completion callbacks on `handle` instead of the current runtime
    pub fn with_callback_runtime(mut self, handle: Handle) -> Self {
        self.callback_runtime = Some(handle);
        self
    }

    /// A fresh coordinator for one attempt
    pub fn coordinator(&self) -> FlowCoordinator<R, S> {
        FlowCoordinator::new(Arc::clone(&self.repository), Arc::clone(&self.sdk_service))
    }

    /// Run one flow and resolve with its result
    pub async fn authenticate(&self, request: FlowRequest) -> FlowResult {
        self.coordinator().run(request).await
    }

    /// Start one flow in the background and report through `completion`
    ///
    /// ## Returns
    /// * `Some(JoinHandle)` - The flow task
    /// * `None` - No runtime was available; `completion` already received a failure
    pub fn start<F>(&self, request: FlowRequest, completion: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(FlowResult) + Send + 'static,
    {
        self.spawn(self.coordinator(), request, completion)
    }

    pub(crate) fn spawn<F>(
        &self,
        coordinator: FlowCoordinator<R, S>,
        request: FlowRequest,
        completion: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(FlowResult) + Send + 'static,
    {
        let runtime = match self.callback_runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => runtime,
            None => {
                tracing::error!("Cannot start 3DS flow outside of a tokio runtime");
                completion(FlowResult::failed(NO_RUNTIME));
                return None;
            }
        };

        Some(runtime.spawn(async move {
            let result = coordinator.run(request).await;
            completion(result);
        }))
    }

    /// Forward a deep link to the active challenge
    pub fn handle_deep_link(&self, url: &Url) -> bool {
        self.sdk_service.open_deep_link(url)
    }
}
