//! Lifecycle actions

use crate::state::{Settlement, SubmissionId};
use formflow_client::{SubmissionRequest, SubmissionResult};

/// Every input to the lifecycle reducer
#[derive(Debug, Clone)]
pub enum LifecycleAction {
    /// Command: start a submission
    Submit {
        /// Correlation id issued by the controller
        id: SubmissionId,
        /// What to POST
        request: SubmissionRequest,
    },

    /// The request finished, successfully or not
    Settled {
        /// Correlation id of the submission
        id: SubmissionId,
        /// Outcome as classified by the transport
        result: SubmissionResult,
    },

    /// The outcome is on screen and the control is usable again (terminal)
    Released {
        /// The finished submission
        settlement: Settlement,
    },

    /// The submission was refused because another one is pending (terminal)
    Rejected {
        /// Correlation id of the refused submission
        id: SubmissionId,
    },
}

impl LifecycleAction {
    /// Whether this action ends the submission `id`
    #[must_use]
    pub fn ends(&self, id: SubmissionId) -> bool {
        match self {
            Self::Released { settlement } => settlement.id == id,
            Self::Rejected { id: rejected } => *rejected == id,
            Self::Submit { .. } | Self::Settled { .. } => false,
        }
    }
}
