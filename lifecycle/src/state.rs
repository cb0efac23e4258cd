//! Lifecycle state types

use chrono::{DateTime, Utc};
use formflow_client::SubmissionResult;
use std::fmt;

/// What the form currently displays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UiState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// A request is in flight, the control is disabled
    Pending,
    /// The last request succeeded
    Succeeded,
    /// The last request failed
    Failed,
}

impl UiState {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether this is the end state of a submission
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Correlation id of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

impl SubmissionId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The submission currently holding the control
///
/// Held from `Submit` until its `Released` is reduced, so the render and
/// release of one outcome never interleave with the next submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    /// Its correlation id
    pub id: SubmissionId,
    /// When it went pending
    pub started_at: DateTime<Utc>,
    /// The outcome arrived and is being put on screen
    pub rendering: bool,
}

impl InFlight {
    /// A submission that just went pending
    #[must_use]
    pub const fn new(id: SubmissionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            started_at,
            rendering: false,
        }
    }
}

/// Record of one finished submission
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Correlation id
    pub id: SubmissionId,
    /// `Succeeded` or `Failed`
    pub state: UiState,
    /// Response fields or the error, as received
    pub result: SubmissionResult,
    /// When the submission went pending
    pub started_at: DateTime<Utc>,
    /// When the outcome arrived
    pub settled_at: DateTime<Utc>,
}

/// State owned by one controller
#[derive(Debug, Clone, Default)]
pub struct LifecycleState {
    /// Current display state
    pub ui: UiState,
    /// Submission holding the control, from `Submit` until its `Released`
    pub in_flight: Option<InFlight>,
    /// Message currently shown, cleared when a new submission starts
    pub message: Option<String>,
    /// Most recent finished submission
    pub last_settlement: Option<Settlement>,
}
