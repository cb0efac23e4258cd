//! Mock implementations for testing.

use chrono::{DateTime, Utc};
use formflow_client::{ApiTransport, Payload, SubmissionError, SubmissionRequest, TransportFuture};
use formflow_core::environment::{Clock, PresentationPort, TriggerEvent};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use formflow_testing::mocks::FixedClock;
/// use formflow_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// let time1 = clock.now();
/// let time2 = clock.now();
/// assert_eq!(time1, time2); // Always the same!
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

enum Reply {
    Respond(Result<Payload, SubmissionError>),
    Panic(String),
}

/// Scripted stand-in for the HTTP API
///
/// Replies are handed out in the order they were scripted, one per request.
/// A request with nothing left to reply fails as a network error.
///
/// A transport built with [`MockTransport::held`] keeps every request
/// in flight until [`MockTransport::open_gate`] is called, which is how
/// tests observe the `Pending` state.
///
/// # Example
///
/// ```
/// use formflow_testing::MockTransport;
/// use serde_json::json;
///
/// let transport = MockTransport::new()
///     .respond_json(json!({"position": 7}))
///     .respond_status(400, Some("Email already registered"));
/// assert_eq!(transport.request_count(), 0);
/// ```
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<SubmissionRequest>>,
    gate: watch::Sender<bool>,
}

impl MockTransport {
    /// Transport with no scripted replies and an open gate
    #[must_use]
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate,
        }
    }

    /// Transport whose requests wait until [`MockTransport::open_gate`]
    #[must_use]
    pub fn held() -> Self {
        let transport = Self::new();
        transport.gate.send_replace(false);
        transport
    }

    /// Queue a 2xx reply
    ///
    /// A body that is not a JSON object becomes a parse failure, the same
    /// way the HTTP client treats it.
    #[must_use]
    pub fn respond_json(self, body: Value) -> Self {
        let result = match body {
            Value::Object(payload) => Ok(payload),
            other => Err(SubmissionError::Network(format!(
                "Response parsing failed: expected a JSON object, got {other}"
            ))),
        };
        self.push(Reply::Respond(result))
    }

    /// Queue a non-2xx reply
    #[must_use]
    pub fn respond_status(self, status: u16, detail: Option<&str>) -> Self {
        self.push(Reply::Respond(Err(SubmissionError::Server {
            status,
            detail: detail.map(str::to_string),
        })))
    }

    /// Queue a failure before any response arrives
    #[must_use]
    pub fn fail_network(self, reason: &str) -> Self {
        self.push(Reply::Respond(Err(SubmissionError::Network(reason.to_string()))))
    }

    /// Queue a request whose future panics
    #[must_use]
    pub fn panic_with(self, message: &str) -> Self {
        self.push(Reply::Panic(message.to_string()))
    }

    /// Let held requests proceed
    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    /// Every request received so far, in arrival order
    #[must_use]
    pub fn requests(&self) -> Vec<SubmissionRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received so far
    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn push(self, reply: Reply) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTransport for MockTransport {
    #[allow(clippy::panic)] // Scripted panic
    fn post_json<'a>(&'a self, request: &'a SubmissionRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            lock(&self.requests).push(request.clone());

            let mut gate = self.gate.subscribe();
            while !*gate.borrow_and_update() {
                if gate.changed().await.is_err() {
                    break;
                }
            }

            let reply = lock(&self.replies).pop_front();
            match reply {
                Some(Reply::Respond(result)) => result,
                Some(Reply::Panic(message)) => panic!("{message}"),
                None => Err(SubmissionError::Network("no scripted reply".to_string())),
            }
        })
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("scripted_replies", &lock(&self.replies).len())
            .field("requests", &lock(&self.requests).len())
            .field("gate_open", &*self.gate.borrow())
            .finish()
    }
}

/// One call made on a [`RecordingPort`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    /// `set_pending(busy_label)`
    SetPending(String),
    /// `set_succeeded(message)`
    SetSucceeded(String),
    /// `set_failed(message)`
    SetFailed(String),
    /// `reset()`
    Reset,
    /// `release()`
    Release,
}

/// What a user would currently see on the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    /// Whether the triggering control accepts clicks
    pub enabled: bool,
    /// Label on the triggering control
    pub label: String,
    /// Status message, if any
    pub message: Option<String>,
    /// How many times the form was cleared
    pub resets: usize,
}

struct PortLog {
    calls: Vec<PortCall>,
    view: ControlView,
}

/// Presentation port that records every call and simulates the control
#[derive(Debug)]
pub struct RecordingPort {
    original_label: String,
    log: Mutex<PortLog>,
}

impl RecordingPort {
    /// Port for a control labelled `label`
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            log: Mutex::new(PortLog {
                calls: Vec::new(),
                view: ControlView {
                    enabled: true,
                    label: label.clone(),
                    message: None,
                    resets: 0,
                },
            }),
            original_label: label,
        }
    }

    /// Calls received so far
    #[must_use]
    pub fn calls(&self) -> Vec<PortCall> {
        lock(&self.log).calls.clone()
    }

    /// Current state of the simulated control
    #[must_use]
    pub fn view(&self) -> ControlView {
        lock(&self.log).view.clone()
    }

    /// Current status message
    #[must_use]
    pub fn message(&self) -> Option<String> {
        lock(&self.log).view.message.clone()
    }

    /// Whether the control is currently enabled
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        lock(&self.log).view.enabled
    }

    /// Number of `release()` calls
    #[must_use]
    pub fn release_count(&self) -> usize {
        lock(&self.log)
            .calls
            .iter()
            .filter(|call| **call == PortCall::Release)
            .count()
    }

    fn record(&self, call: PortCall, update: impl FnOnce(&mut ControlView)) {
        let mut log = lock(&self.log);
        update(&mut log.view);
        log.calls.push(call);
    }
}

impl std::fmt::Debug for PortLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortLog")
            .field("calls", &self.calls.len())
            .field("view", &self.view)
            .finish()
    }
}

impl PresentationPort for RecordingPort {
    fn set_pending(&self, busy_label: &str) {
        self.record(PortCall::SetPending(busy_label.to_string()), |view| {
            view.enabled = false;
            view.label = busy_label.to_string();
            view.message = None;
        });
    }

    fn set_succeeded(&self, message: &str) {
        self.record(PortCall::SetSucceeded(message.to_string()), |view| {
            view.message = Some(message.to_string());
        });
    }

    fn set_failed(&self, message: &str) {
        self.record(PortCall::SetFailed(message.to_string()), |view| {
            view.message = Some(message.to_string());
        });
    }

    fn reset(&self) {
        self.record(PortCall::Reset, |view| view.resets += 1);
    }

    fn release(&self) {
        let label = self.original_label.clone();
        self.record(PortCall::Release, |view| {
            view.enabled = true;
            view.label = label;
        });
    }
}

/// Trigger event that remembers whether its default was prevented
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingEvent {
    default_prevented: bool,
}

impl RecordingEvent {
    /// A fresh, untouched event
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_prevented: false,
        }
    }

    /// Whether `prevent_default` was called
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl TriggerEvent for RecordingEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
