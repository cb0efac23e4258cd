//! Injected dependencies of the lifecycle reducer

use crate::message::Feedback;
use formflow_client::ApiTransport;
use formflow_core::environment::{Clock, PresentationPort, SystemClock};
use std::sync::Arc;

/// What a submission reaches outside its own state
///
/// Cloned into every effect; all members are shared.
#[derive(Clone)]
pub struct LifecycleEnvironment {
    /// Sends the request
    pub transport: Arc<dyn ApiTransport>,
    /// The form being driven
    pub port: Arc<dyn PresentationPort>,
    /// Timestamps settlements
    pub clock: Arc<dyn Clock>,
    /// Labels and messages
    pub feedback: Arc<Feedback>,
}

impl LifecycleEnvironment {
    /// Environment on the system clock
    #[must_use]
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        port: Arc<dyn PresentationPort>,
        feedback: Feedback,
    ) -> Self {
        Self {
            transport,
            port,
            clock: Arc::new(SystemClock),
            feedback: Arc::new(feedback),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for LifecycleEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEnvironment")
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}
