//! Guaranteed release of the triggering control

use formflow_core::environment::PresentationPort;
use std::sync::Arc;

/// Calls [`PresentationPort::release`] when dropped
///
/// Covers every exit path of a submission, including a panicking or
/// dropped future. [`ReleaseGuard::disarm`] hands responsibility to the
/// next stage without releasing.
#[must_use = "dropping the guard releases the control immediately"]
pub struct ReleaseGuard {
    port: Option<Arc<dyn PresentationPort>>,
}

impl ReleaseGuard {
    /// Arm a guard for `port`
    pub fn new(port: Arc<dyn PresentationPort>) -> Self {
        Self { port: Some(port) }
    }

    /// Release now
    pub fn release(self) {
        drop(self);
    }

    /// Give up responsibility without releasing
    pub fn disarm(mut self) {
        self.port = None;
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if let Some(port) = self.port.take() {
            port.release();
        }
    }
}

impl std::fmt::Debug for ReleaseGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseGuard")
            .field("armed", &self.port.is_some())
            .finish()
    }
}
