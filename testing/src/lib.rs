//! # Formflow Testing
//!
//! Testing utilities for formflow.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - A scripted [`MockTransport`] standing in for the HTTP API
//! - A [`RecordingPort`] that logs every presentation call
//! - Given-When-Then helpers for reducers
//!
//! ## Example
//!
//! ```ignore
//! use formflow_testing::{MockTransport, RecordingEvent, RecordingPort};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_signup() {
//!     let transport = Arc::new(MockTransport::new().respond_json(json!({"position": 7})));
//!     let port = Arc::new(RecordingPort::new("Join Waitlist"));
//!     let controller = RequestLifecycleController::new(config, transport, port.clone(), Feedback::waitlist());
//!
//!     let state = controller.submit(&mut RecordingEvent::new(), "/waitlist/signup", &payload).await?;
//!     assert!(port.message().unwrap().contains("#7"));
//! }
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mock implementations of environment traits
pub mod mocks;


// Re-export commonly used items
pub use mocks::{
    ControlView, FixedClock, MockTransport, PortCall, RecordingEvent, RecordingPort, test_clock,
};
pub use reducer_test::{ReducerTest, assertions, run_effects};

/// Install a test-friendly tracing subscriber
///
/// Honors `RUST_LOG` and defaults to `warn`. Safe to call from every test;
/// only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
