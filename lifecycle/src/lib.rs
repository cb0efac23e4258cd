//! # Formflow Lifecycle
//!
//! Drives a user-triggered API submission through the form's display
//! states: `Idle → Pending → Succeeded | Failed`, releasing the triggering
//! control on every path.
//!
//! ## Example
//!
//! ```no_run
//! use formflow_client::{ApiConfig, WaitlistSignup};
//! use formflow_core::environment::{PresentationPort, TriggerEvent};
//! use formflow_lifecycle::{Feedback, RequestLifecycleController, UiState};
//! use std::sync::Arc;
//!
//! struct Form;
//!
//! impl PresentationPort for Form {
//!     fn set_pending(&self, busy_label: &str) { println!("[{busy_label}]"); }
//!     fn set_succeeded(&self, message: &str) { println!("{message}"); }
//!     fn set_failed(&self, message: &str) { eprintln!("{message}"); }
//!     fn reset(&self) {}
//!     fn release(&self) {}
//! }
//!
//! struct Submit;
//!
//! impl TriggerEvent for Submit {
//!     fn prevent_default(&mut self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = RequestLifecycleController::production(
//!         ApiConfig::from_env()?,
//!         Arc::new(Form),
//!         Feedback::waitlist(),
//!     );
//!
//!     let state = controller
//!         .submit(&mut Submit, "/waitlist/signup", &WaitlistSignup::new("a@b.com"))
//!         .await?;
//!     assert_ne!(state, UiState::Pending);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod controller;
pub mod environment;
pub mod error;
pub mod guard;
pub mod message;
pub mod reducer;
pub mod state;

pub use actions::LifecycleAction;
pub use controller::{DEFAULT_SETTLE_TIMEOUT, LifecycleStore, RequestLifecycleController};
pub use environment::LifecycleEnvironment;
pub use error::LifecycleError;
pub use guard::ReleaseGuard;
pub use message::{Feedback, MessageTemplate};
pub use reducer::LifecycleReducer;
pub use state::{InFlight, LifecycleState, Settlement, SubmissionId, UiState};
