//! View-state projection
//!
//! Exposes the flow progress as an observable [`FlowState`] for UI layers.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::application::controller::ThreeDSFlowController;
use crate::application::coordinator::FlowRequest;
use crate::domain::engine::SdkService;
use crate::domain::entities::{FlowResult, FlowState};
use crate::domain::repository::ThreeDSRepository;

pub struct FlowViewModel<R, S>
where
    R: ThreeDSRepository,
    S: SdkService,
{
    controller: ThreeDSFlowController<R, S>,
    state: Arc<watch::Sender<FlowState>>,
}

impl<R, S> FlowViewModel<R, S>
where
    R: ThreeDSRepository + Send + Sync + 'static,
    S: SdkService + Send + Sync + 'static,
    S::Handle: 'static,
{
    pub fn new(controller: ThreeDSFlowController<R, S>) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            controller,
            state: Arc::new(state),
        }
    }

    /// Current state
    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    /// Start a flow; its progress is published to subscribers
    pub fn start(&self, request: FlowRequest) -> Option<JoinHandle<()>> {
        let coordinator = self
            .controller
            .coordinator()
            .with_state_sink(Arc::clone(&self.state));
        let state = Arc::clone(&self.state);

        self.controller
            .spawn(coordinator, request, move |result: FlowResult| {
                // Normally already published by the coordinator; not so on the no-runtime path.
                let completed = FlowState::Completed(result);
                state.send_if_modified(|current| {
                    if *current == completed {
                        return false;
                    }
                    *current = completed;
                    true
                });
            })
    }

    pub fn handle_deep_link(&self, url: &Url) -> bool {
        self.controller.handle_deep_link(url)
    }
}
