//! End-to-end flow tests against the fake engine and an in-memory repository

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{
    API_KEY, ChallengeScript, DIRECTORY_SERVER_ID, FakeEngine, StubRepository, wait_until,
};
use threeds::application::config_provider::DefaultConfigProvider;
use threeds::domain::entities::{AuthenticationStatus, ChallengeData, FlowState};
use threeds::error::TransportError;
use threeds::infra::engine::CHALLENGE_IN_PROGRESS;
use threeds::models::{EngineLogLevel, PresentationContext};
use threeds::{
    EngineSdkService, ErrorKind, FlowRequest, FlowResult, FlowViewModel, ThreeDSFlowController,
};
use tokio::sync::oneshot;
use url::Url;

fn challenge() -> AuthenticationStatus {
    AuthenticationStatus::Challenge(ChallengeData {
        server_transaction_id: "abc-123".to_string(),
        acs_transaction_id: "acs-1".to_string(),
        acs_signed_content: Some("signed".to_string()),
        acs_reference_number: Some("ref-1".to_string()),
        sdk_transaction_id: "sdk-trans-1".to_string(),
    })
}

fn request() -> FlowRequest {
    FlowRequest::new(
        Url::parse("https://api.example.com/payments/pay_1/authorize").unwrap(),
        PresentationContext::detached(),
    )
    .with_return_url("app://x")
}

fn controller(
    repository: StubRepository,
    engine: &Arc<FakeEngine>,
) -> ThreeDSFlowController<StubRepository, EngineSdkService<FakeEngine>> {
    let sdk = EngineSdkService::new(Arc::clone(engine), DefaultConfigProvider::default());
    ThreeDSFlowController::new(repository, sdk)
}

#[tokio::test]
async fn test_frictionless_success_completes_without_challenge() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::new(AuthenticationStatus::Success), &engine);

    let result = flow.authenticate(request()).await;

    assert_eq!(result, FlowResult::Completed);
    let log = engine.log();
    assert_eq!(log.initialized, 1);
    assert_eq!(log.api_keys, vec![API_KEY.to_string()]);
    assert!(log.challenges.is_empty());
}

#[tokio::test]
async fn test_authentication_request_built_from_session() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let repository = Arc::new(StubRepository::new(AuthenticationStatus::Success));
    let sdk = Arc::new(EngineSdkService::new(
        Arc::clone(&engine),
        DefaultConfigProvider::default(),
    ));
    let flow = ThreeDSFlowController::from_shared(Arc::clone(&repository), sdk);

    flow.authenticate(request()).await;

    let requests = repository.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].sdk_transaction_id, "sdk-trans-1");
    assert_eq!(requests[0].max_timeout_minutes, 5);
    assert_eq!(requests[0].encrypted_device_info, "encrypted-device-data");
}

#[tokio::test]
async fn test_challenge_with_status_y_completes_and_releases_guard() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let sdk = Arc::new(EngineSdkService::new(
        Arc::clone(&engine),
        DefaultConfigProvider::default(),
    ));
    let flow =
        ThreeDSFlowController::from_shared(Arc::new(StubRepository::new(challenge())), Arc::clone(&sdk));

    let result = flow.authenticate(request()).await;

    assert_eq!(result, FlowResult::Completed);
    assert!(!sdk.is_challenge_active());

    let log = engine.log();
    assert_eq!(log.challenges.len(), 1);
    let parameters = &log.challenges[0];
    assert_eq!(parameters.server_transaction_id, "abc-123");
    assert_eq!(parameters.acs_transaction_id, "acs-1");
    assert_eq!(parameters.acs_reference_number.as_deref(), Some("ref-1"));
    assert_eq!(
        parameters.requestor_app_url.as_deref(),
        Some("app://x?transID=abc-123")
    );
}

#[tokio::test]
async fn test_challenge_outcomes_map_to_results() {
    let cases = [
        (ChallengeScript::Complete("N"), FlowResult::failed("incomplete: N")),
        (ChallengeScript::Cancel, FlowResult::Cancelled),
        (ChallengeScript::TimeOut, FlowResult::Cancelled),
        (
            ChallengeScript::ProtocolError(Some("Invalid CRes")),
            FlowResult::failed("Invalid CRes"),
        ),
        (ChallengeScript::ProtocolError(None), FlowResult::failed("Protocol error")),
        (ChallengeScript::RuntimeError(None), FlowResult::failed("Runtime error")),
        (
            ChallengeScript::Throw("UI unavailable"),
            FlowResult::failed("UI unavailable"),
        ),
    ];

    for (script, expected) in cases {
        let engine = FakeEngine::new(script.clone());
        let flow = controller(StubRepository::new(challenge()), &engine);
        let result = flow.authenticate(request()).await;
        assert_eq!(result, expected, "script {:?}", script);
    }
}

#[tokio::test]
async fn test_no_return_url_means_no_requestor_url() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::new(challenge()), &engine);
    let mut request = request();
    request.return_url = None;

    assert_eq!(flow.authenticate(request).await, FlowResult::Completed);
    assert_eq!(engine.log().challenges[0].requestor_app_url, None);
}

#[tokio::test]
async fn test_config_failure_skips_session() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::failing_config(), &engine);

    let result = flow.authenticate(request()).await;

    assert_eq!(result, FlowResult::failed("Config unavailable"));
    assert_eq!(engine.log().initialized, 0);
}

#[tokio::test]
async fn test_bad_key_fails_sdk_start() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let mut config = common::sealed_config();
    config.encrypted_key = "%%%".to_string();
    let repository = StubRepository::new(AuthenticationStatus::Success).with_config(Ok(config));
    let flow = controller(repository, &engine);

    let result = flow.authenticate(request()).await;

    assert_eq!(
        result,
        FlowResult::failed("SDK start failed: Session creation failed: Invalid API key encoding")
    );
    assert_eq!(engine.log().initialized, 0);
}

#[tokio::test]
async fn test_authentication_outcomes() {
    let cases = [
        (
            Err(TransportError::InvalidResponse("HTTP 502".to_string())),
            FlowResult::failed("Auth failed: Invalid response: HTTP 502"),
        ),
        (
            Ok(AuthenticationStatus::Failed),
            FlowResult::failed("Authentication failed"),
        ),
        (
            Ok(AuthenticationStatus::Unknown("challenge_missing_ares".to_string())),
            FlowResult::failed("Unknown authentication status: challenge_missing_ares"),
        ),
    ];

    for (status, expected) in cases {
        let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
        let repository = StubRepository::new(AuthenticationStatus::Success).with_status(status);
        let flow = controller(repository, &engine);
        assert_eq!(flow.authenticate(request()).await, expected);
        assert!(engine.log().challenges.is_empty());
    }
}

#[tokio::test]
async fn test_only_one_challenge_at_a_time() {
    let engine = FakeEngine::new(ChallengeScript::Hold);
    let sdk = Arc::new(EngineSdkService::new(
        Arc::clone(&engine),
        DefaultConfigProvider::default(),
    ));
    let flow = Arc::new(ThreeDSFlowController::from_shared(
        Arc::new(StubRepository::new(challenge())),
        Arc::clone(&sdk),
    ));

    let first = {
        let flow = Arc::clone(&flow);
        tokio::spawn(async move { flow.authenticate(request()).await })
    };
    wait_until(|| engine.held().is_some()).await;

    let second = flow.authenticate(request()).await;
    assert_eq!(second, FlowResult::failed(CHALLENGE_IN_PROGRESS));
    assert_eq!(engine.log().challenges.len(), 1);

    // Deep link reaches the engine while the first challenge runs.
    let link = Url::parse("app://x?transID=abc-123").unwrap();
    assert!(flow.handle_deep_link(&link));

    assert!(engine.held().unwrap().completed("Y"));
    assert_eq!(first.await.unwrap(), FlowResult::Completed);

    // After release, deep links are no longer forwarded.
    assert!(!sdk.is_challenge_active());
    assert!(!flow.handle_deep_link(&link));
    assert_eq!(engine.log().deep_links.len(), 1);
}

#[tokio::test]
async fn test_dismissed_presentation_cancels_challenge() {
    let engine = FakeEngine::new(ChallengeScript::Hold);
    let sdk = Arc::new(EngineSdkService::new(
        Arc::clone(&engine),
        DefaultConfigProvider::default(),
    ));
    let flow = ThreeDSFlowController::from_shared(
        Arc::new(StubRepository::new(challenge())),
        Arc::clone(&sdk),
    );
    let context = PresentationContext::new("checkout-screen");
    let request = FlowRequest::new(
        Url::parse("https://api.example.com/payments/pay_1/authorize").unwrap(),
        context.clone(),
    );

    let running = tokio::spawn(async move { flow.authenticate(request).await });
    wait_until(|| engine.held().is_some()).await;
    context.dismiss();

    assert_eq!(running.await.unwrap(), FlowResult::Cancelled);
    assert!(!sdk.is_challenge_active());
}

#[tokio::test]
async fn test_reported_outcome_wins_over_dismissal() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let sdk = EngineSdkService::new(Arc::clone(&engine), DefaultConfigProvider::default())
        .with_challenge_deadline(Duration::ZERO);
    let flow = ThreeDSFlowController::new(StubRepository::new(challenge()), sdk);
    let context = PresentationContext::detached();
    context.dismiss();
    let request = FlowRequest::new(
        Url::parse("https://api.example.com/payments/pay_1/authorize").unwrap(),
        context,
    );

    for _ in 0..20 {
        assert_eq!(flow.authenticate(request.clone()).await, FlowResult::Completed);
    }
    assert_eq!(engine.log().challenges.len(), 20);
}

#[tokio::test]
async fn test_silent_engine_hits_deadline() {
    let engine = FakeEngine::new(ChallengeScript::Hold);
    let sdk = EngineSdkService::new(Arc::clone(&engine), DefaultConfigProvider::default())
        .with_challenge_deadline(Duration::from_millis(50));
    let flow = ThreeDSFlowController::new(StubRepository::new(challenge()), sdk);

    assert_eq!(flow.authenticate(request()).await, FlowResult::Cancelled);
}

#[tokio::test]
async fn test_start_invokes_completion_once() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::new(challenge()), &engine);
    let (tx, rx) = oneshot::channel();

    let task = flow.start(request(), move |result| {
        tx.send(result).unwrap();
    });

    assert!(task.is_some());
    assert_eq!(rx.await.unwrap(), FlowResult::Completed);
}

#[test]
fn test_start_without_runtime_reports_failure() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::new(AuthenticationStatus::Success), &engine);
    let (tx, mut rx) = oneshot::channel();

    let task = flow.start(request(), move |result| {
        tx.send(result).unwrap();
    });

    assert!(task.is_none());
    assert_eq!(
        rx.try_recv().unwrap(),
        FlowResult::failed("No async runtime available")
    );
}

#[test]
fn test_start_on_configured_runtime() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::new(AuthenticationStatus::Success), &engine)
        .with_callback_runtime(runtime.handle().clone());
    let (tx, rx) = std::sync::mpsc::channel();

    let task = flow.start(request(), move |result| {
        tx.send(result).unwrap();
    });

    assert!(task.is_some());
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        FlowResult::Completed
    );
}

#[tokio::test]
async fn test_coordinator_publishes_states() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let flow = controller(StubRepository::new(challenge()), &engine);
    let coordinator = flow.coordinator();
    let mut states = coordinator.subscribe();
    assert_eq!(coordinator.state(), FlowState::Idle);

    let seen = tokio::spawn(async move {
        let mut seen = Vec::new();
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            let done = state.is_terminal();
            seen.push(state);
            if done {
                break;
            }
        }
        seen
    });

    let result = coordinator.run(request()).await;
    assert_eq!(result, FlowResult::Completed);
    assert_eq!(
        coordinator.state(),
        FlowState::Completed(FlowResult::Completed)
    );

    let seen = seen.await.unwrap();
    assert_eq!(seen.last(), Some(&FlowState::Completed(FlowResult::Completed)));
}

#[tokio::test]
async fn test_view_model_reaches_completed() {
    let engine = FakeEngine::new(ChallengeScript::Cancel);
    let view_model = FlowViewModel::new(controller(StubRepository::new(challenge()), &engine));
    let mut states = view_model.subscribe();
    assert_eq!(view_model.state(), FlowState::Idle);

    let task = view_model.start(request()).unwrap();
    task.await.unwrap();

    let final_state = states
        .wait_for(|state| state.is_terminal())
        .await
        .unwrap()
        .clone();
    assert_eq!(final_state, FlowState::Completed(FlowResult::Cancelled));
    assert_eq!(view_model.state().result(), Some(&FlowResult::Cancelled));
}

#[tokio::test]
async fn test_provider_settings_reach_engine() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let provider = DefaultConfigProvider::new(EngineLogLevel::Debug, Some("th-TH".to_string()));
    let sdk = EngineSdkService::new(Arc::clone(&engine), provider);
    let flow = ThreeDSFlowController::new(StubRepository::new(AuthenticationStatus::Success), sdk);

    flow.authenticate(request()).await;

    let log = engine.log();
    assert_eq!(log.locales, vec![Some("th-TH".to_string())]);
    assert_eq!(log.schemes.len(), 1);
    assert_eq!(log.schemes[0].name, "visa");
    assert_eq!(log.schemes[0].ids, vec![DIRECTORY_SERVER_ID.to_string()]);
    assert_eq!(log.schemes[0].encryption_key_value, "MIIBszCCAVmgAwIBAgIUQUJDREVGRw==");
    assert_eq!(
        log.schemes[0].device_info_encryption_alg.as_deref(),
        Some("RSA-OAEP-256")
    );
    assert_eq!(
        log.schemes[0].device_info_encryption_enc.as_deref(),
        Some("A128CBC-HS256")
    );
}

#[tokio::test]
async fn test_results_convert_to_app_errors() {
    let engine = FakeEngine::new(ChallengeScript::Cancel);
    let flow = controller(StubRepository::new(challenge()), &engine);

    let err = flow.authenticate(request()).await.into_app_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);

    let flow = controller(StubRepository::failing_config(), &engine);
    let err = flow.authenticate(request()).await.into_app_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    assert_eq!(err.message(), "Config unavailable");
}

#[tokio::test]
async fn test_each_flow_fetches_config() {
    let engine = FakeEngine::new(ChallengeScript::Complete("Y"));
    let repository = Arc::new(StubRepository::new(AuthenticationStatus::Success));
    let flow = ThreeDSFlowController::from_shared(
        Arc::clone(&repository),
        Arc::new(EngineSdkService::new(
            Arc::clone(&engine),
            DefaultConfigProvider::default(),
        )),
    );

    flow.authenticate(request()).await;
    flow.authenticate(request()).await;

    assert_eq!(repository.config_fetches.load(Ordering::SeqCst), 2);
    assert_eq!(engine.log().initialized, 2);
}
