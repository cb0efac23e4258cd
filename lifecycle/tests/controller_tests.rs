//! Controller tests against a scripted transport

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use formflow_client::{
    ApiConfig, ExecutionCheck, ExecutionVerdict, RiskAssessment, RiskReport, WaitlistSignup,
};
use formflow_core::environment::PresentationPort;
use formflow_lifecycle::{
    Feedback, LifecycleError, RequestLifecycleController, SubmissionId, UiState,
};
use formflow_testing::{MockTransport, PortCall, RecordingEvent, RecordingPort, init_tracing};
use serde_json::json;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Test Fixtures
// ============================================================================

const WAITLIST_SUCCESS_3: &str =
    "✅ Thanks! You're #3 on the waitlist. We'll notify you when we launch!";

fn config() -> ApiConfig {
    ApiConfig::new("http://localhost:8001").unwrap()
}

fn controller(
    transport: &Arc<MockTransport>,
    port: &Arc<RecordingPort>,
    feedback: Feedback,
) -> RequestLifecycleController {
    init_tracing();
    RequestLifecycleController::new(config(), transport.clone(), port.clone(), feedback)
        .with_settle_timeout(Duration::from_secs(5))
}

fn signup() -> serde_json::Value {
    json!({"email": "a@b.com", "name": null, "company": null})
}

async fn wait_until_pending(controller: &RequestLifecycleController) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while controller.state().await != UiState::Pending {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("submission never went pending");
}

// ============================================================================
// Outcomes
// ============================================================================

#[tokio::test]
async fn test_success_message_includes_position_and_resets_form() {
    let transport = Arc::new(MockTransport::new().respond_json(json!({"position": 7})));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());
    let mut event = RecordingEvent::new();

    let state = controller
        .submit(&mut event, "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(state, UiState::Succeeded);
    assert!(event.default_prevented());

    let view = port.view();
    assert!(view.message.unwrap().contains('7'));
    assert_eq!(view.resets, 1);
    assert!(view.enabled);
    assert_eq!(view.label, "Join Waitlist");
}

#[tokio::test]
async fn test_server_detail_is_shown_and_control_reenabled() {
    let transport = Arc::new(MockTransport::new().respond_status(400, Some("Email already registered")));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    let state = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(state, UiState::Failed);
    assert!(port.message().unwrap().contains("Email already registered"));
    assert!(port.is_enabled());
    assert_eq!(port.view().resets, 0);
}

#[tokio::test]
async fn test_network_failure_still_releases_control() {
    let transport = Arc::new(MockTransport::new().fail_network("connection refused"));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    let state = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(state, UiState::Failed);
    assert_eq!(
        port.message().as_deref(),
        Some("⚠️ Failed to join waitlist. Please try again.")
    );
    assert!(port.is_enabled());
    assert_eq!(port.release_count(), 1);
}

#[tokio::test]
async fn test_non_object_response_is_a_failure() {
    let transport = Arc::new(MockTransport::new().respond_json(json!("ok")));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    let state = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(state, UiState::Failed);
    assert!(port.is_enabled());
}

#[tokio::test]
async fn test_port_calls_follow_lifecycle_order() {
    let transport = Arc::new(MockTransport::new().respond_json(json!({"email": "a@b.com", "position": 3})));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(
        port.calls(),
        vec![
            PortCall::SetPending("Joining...".to_string()),
            PortCall::SetSucceeded(WAITLIST_SUCCESS_3.to_string()),
            PortCall::Reset,
            PortCall::Release,
        ]
    );
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_waitlist_request_and_exact_message() {
    let transport = Arc::new(MockTransport::new().respond_json(json!({"email": "a@b.com", "position": 3})));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].endpoint().as_str(),
        "http://localhost:8001/waitlist/signup"
    );
    assert_eq!(serde_json::Value::Object(requests[0].payload().clone()), signup());

    assert_eq!(port.message().as_deref(), Some(WAITLIST_SUCCESS_3));
    assert_eq!(controller.message().await.as_deref(), Some(WAITLIST_SUCCESS_3));
}

#[tokio::test]
async fn test_risk_fields_surface_unmodified() {
    let transport = Arc::new(
        MockTransport::new().respond_json(json!({"risk_score": 0.42, "risk_level": "MEDIUM"})),
    );
    let port = Arc::new(RecordingPort::new("Assess"));
    let controller = controller(&transport, &port, Feedback::risk());

    let settlement = controller
        .submit_payload(&mut RecordingEvent::new(), &RiskAssessment::new(5000.0, "STRATEGIC"))
        .await
        .unwrap();

    assert_eq!(settlement.state, UiState::Succeeded);
    assert_eq!(settlement.result.field("risk_score"), Some(&json!(0.42)));
    assert_eq!(settlement.result.field("risk_level"), Some(&json!("MEDIUM")));

    let report: RiskReport = settlement.result.decode().unwrap();
    assert_eq!(report.risk_score, Some(0.42));

    assert_eq!(port.message().as_deref(), Some("Risk score 0.42 (MEDIUM)"));
    assert_eq!(
        transport.requests()[0].endpoint().as_str(),
        "http://localhost:8001/risk/assess"
    );
}

#[tokio::test]
async fn test_execution_check_posts_to_autonomy_endpoint() {
    let transport = Arc::new(MockTransport::new().respond_json(json!({
        "should_execute": false,
        "reason": "Requires human approval",
        "task_type": "financial",
        "risk_level": "HIGH"
    })));
    let port = Arc::new(RecordingPort::new("Check"));
    let controller = controller(&transport, &port, Feedback::autonomy());

    let settlement = controller
        .submit_payload(&mut RecordingEvent::new(), &ExecutionCheck::new("financial", "HIGH"))
        .await
        .unwrap();

    let verdict: ExecutionVerdict = settlement.result.decode().unwrap();
    assert_eq!(verdict.should_execute, Some(false));
    assert_eq!(
        port.message().as_deref(),
        Some("Auto-execute: false. Requires human approval")
    );
    assert_eq!(
        transport.requests()[0].endpoint().as_str(),
        "http://localhost:8001/autonomy/should-execute"
    );
}

#[tokio::test]
async fn test_dispatch_returns_settlement() {
    let transport = Arc::new(MockTransport::new().respond_json(json!({"position": 12})));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());
    let request = config().request(&WaitlistSignup::new("a@b.com")).unwrap();
    let mut event = RecordingEvent::new();

    let settlement = controller.dispatch(&mut event, request).await.unwrap();

    assert!(event.default_prevented());
    assert_eq!(settlement.id, SubmissionId::new(1));
    assert_eq!(settlement.result.field("position"), Some(&json!(12)));
    assert!(settlement.settled_at >= settlement.started_at);
    assert_eq!(controller.last_settlement().await, Some(settlement));
}

#[tokio::test]
async fn test_invalid_payload_sends_nothing() {
    let transport = Arc::new(MockTransport::new());
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());
    let mut event = RecordingEvent::new();

    let result = controller
        .submit(&mut event, "/waitlist/signup", &json!({"tags": ["a", "b"]}))
        .await;

    assert!(matches!(result, Err(LifecycleError::Client(_))));
    assert!(event.default_prevented());
    assert_eq!(transport.request_count(), 0);
    assert!(port.calls().is_empty());
    assert_eq!(controller.state().await, UiState::Idle);
}

// ============================================================================
// Sequencing
// ============================================================================

#[tokio::test]
async fn test_sequential_submits_are_independent() {
    let transport = Arc::new(
        MockTransport::new()
            .respond_json(json!({"position": 3}))
            .respond_status(400, Some("Email already registered")),
    );
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    let first = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();
    let second = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(first, UiState::Succeeded);
    assert_eq!(second, UiState::Failed);
    assert_eq!(controller.state().await, UiState::Failed);
    assert_eq!(transport.request_count(), 2);

    assert_eq!(
        port.calls(),
        vec![
            PortCall::SetPending("Joining...".to_string()),
            PortCall::SetSucceeded(WAITLIST_SUCCESS_3.to_string()),
            PortCall::Reset,
            PortCall::Release,
            PortCall::SetPending("Joining...".to_string()),
            PortCall::SetFailed("⚠️ Email already registered. Please try again.".to_string()),
            PortCall::Release,
        ]
    );
    assert!(port.is_enabled());
}

#[tokio::test]
async fn test_submit_while_pending_is_rejected() {
    let transport = Arc::new(MockTransport::held().respond_json(json!({"position": 1})));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move {
            controller
                .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
                .await
        }
    });

    wait_until_pending(&controller).await;
    assert!(!port.is_enabled());

    let mut second_event = RecordingEvent::new();
    let second = controller
        .submit(&mut second_event, "/waitlist/signup", &signup())
        .await;

    assert!(matches!(second, Err(LifecycleError::AlreadyPending)));
    assert!(second_event.default_prevented());
    assert_eq!(controller.state().await, UiState::Pending);

    transport.open_gate();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, UiState::Succeeded);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(port.release_count(), 1);
    assert!(port.is_enabled());
}

/// Records like [`RecordingPort`] but parks the first success render until
/// the test lets it go
struct StalledRenderPort {
    inner: RecordingPort,
    rendering: Notify,
    resume: Mutex<Option<mpsc::Receiver<()>>>,
}

impl StalledRenderPort {
    fn new() -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let port = Self {
            inner: RecordingPort::new("Join Waitlist"),
            rendering: Notify::new(),
            resume: Mutex::new(Some(rx)),
        };
        (port, tx)
    }
}

impl PresentationPort for StalledRenderPort {
    fn set_pending(&self, busy_label: &str) {
        self.inner.set_pending(busy_label);
    }

    fn set_succeeded(&self, message: &str) {
        let resume = self.resume.lock().unwrap().take();
        if let Some(resume) = resume {
            self.rendering.notify_one();
            let _ = resume.recv();
        }
        self.inner.set_succeeded(message);
    }

    fn set_failed(&self, message: &str) {
        self.inner.set_failed(message);
    }

    fn reset(&self) {
        self.inner.reset();
    }

    fn release(&self) {
        self.inner.release();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_while_outcome_renders_is_rejected() {
    init_tracing();
    let transport = Arc::new(
        MockTransport::new()
            .respond_json(json!({"position": 3}))
            .respond_json(json!({"position": 4})),
    );
    let (port, resume) = StalledRenderPort::new();
    let port = Arc::new(port);
    let controller = RequestLifecycleController::new(
        config(),
        transport.clone(),
        port.clone(),
        Feedback::waitlist(),
    )
    .with_settle_timeout(Duration::from_secs(5));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move {
            controller
                .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
                .await
        }
    });

    tokio::time::timeout(Duration::from_secs(1), port.rendering.notified())
        .await
        .expect("first outcome never rendered");
    assert!(!port.inner.is_enabled());

    let second = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await;
    assert!(matches!(second, Err(LifecycleError::AlreadyPending)));
    assert!(!port.inner.is_enabled());

    resume.send(()).unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, UiState::Succeeded);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(port.inner.release_count(), 1);
    assert!(port.inner.is_enabled());
    assert_eq!(
        port.inner.calls(),
        vec![
            PortCall::SetPending("Joining...".to_string()),
            PortCall::SetSucceeded(WAITLIST_SUCCESS_3.to_string()),
            PortCall::Reset,
            PortCall::Release,
        ]
    );

    // Once released, the next submission goes through
    let third = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();
    assert_eq!(third, UiState::Succeeded);
    assert_eq!(transport.request_count(), 2);
}

// ============================================================================
// Cleanup
// ============================================================================

#[tokio::test]
async fn test_panicking_transport_still_releases() {
    let transport = Arc::new(MockTransport::new().panic_with("transport exploded"));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist());

    let state = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await
        .unwrap();

    assert_eq!(state, UiState::Failed);
    assert_eq!(port.release_count(), 1);
    assert!(port.is_enabled());
}

#[tokio::test]
async fn test_settle_timeout_does_not_cancel_request() {
    let transport = Arc::new(MockTransport::held().respond_json(json!({"position": 2})));
    let port = Arc::new(RecordingPort::new("Join Waitlist"));
    let controller = controller(&transport, &port, Feedback::waitlist())
        .with_settle_timeout(Duration::from_millis(50));

    let result = controller
        .submit(&mut RecordingEvent::new(), "/waitlist/signup", &signup())
        .await;

    assert!(matches!(result, Err(LifecycleError::SettleTimeout(_))));
    assert_eq!(controller.state().await, UiState::Pending);
    assert!(!port.is_enabled());

    transport.open_gate();

    tokio::time::timeout(Duration::from_secs(1), async {
        while !port.is_enabled() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("control never released");

    assert_eq!(controller.state().await, UiState::Succeeded);
    assert_eq!(port.release_count(), 1);
}
