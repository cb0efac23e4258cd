//! Controller errors
//!
//! Request failures are not errors here: they end as a `Failed` state. These
//! cover a submission that never ran or could not be observed to finish.

use formflow_client::ClientError;
use formflow_runtime::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Why `submit` could not report a final state
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Endpoint or payload was invalid; nothing was sent
    #[error("Invalid submission: {0}")]
    Client(#[from] ClientError),

    /// Another submission on this controller is still pending
    #[error("A submission is already pending")]
    AlreadyPending,

    /// The submission did not settle within the configured wait
    ///
    /// The request is not cancelled; the form still settles when it
    /// completes.
    #[error("Submission did not settle within {0:?}")]
    SettleTimeout(Duration),

    /// The store stopped delivering actions
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
