//! Lifecycle reducer
//!
//! `Submit` → `Settled` → `Released` for an accepted submission, `Submit` →
//! `Rejected` while another one holds the control. A submission holds it
//! until its `Released` is reduced. The reducer only decides; the port and
//! transport are driven from effects.

use crate::actions::LifecycleAction;
use crate::environment::LifecycleEnvironment;
use crate::guard::ReleaseGuard;
use crate::state::{InFlight, LifecycleState, Settlement, SubmissionId, UiState};
use formflow_client::{SubmissionError, SubmissionRequest, SubmissionResult};
use formflow_core::environment::PresentationPort;
use formflow_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Reducer for one form's submissions
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleReducer;

impl Reducer for LifecycleReducer {
    type State = LifecycleState;
    type Action = LifecycleAction;
    type Environment = LifecycleEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LifecycleAction::Submit { id, request } => {
                if let Some(in_flight) = state.in_flight {
                    tracing::warn!(
                        %id,
                        pending = %in_flight.id,
                        rendering = in_flight.rendering,
                        "Submission rejected, another request is pending"
                    );
                    metrics::counter!("submission.rejected").increment(1);
                    return smallvec![async_effect! { Some(LifecycleAction::Rejected { id }) }];
                }

                tracing::debug!(%id, endpoint = %request.endpoint(), "Submission pending");
                metrics::counter!("submission.started").increment(1);

                state.ui = UiState::Pending;
                state.message = None;
                state.in_flight = Some(InFlight::new(id, env.clock.now()));

                smallvec![request_effect(id, request, env)]
            },

            LifecycleAction::Settled { id, result } => {
                let Some(in_flight) = state
                    .in_flight
                    .filter(|in_flight| in_flight.id == id && !in_flight.rendering)
                else {
                    tracing::debug!(%id, "Ignoring outcome of a submission that is not in flight");
                    return smallvec![Effect::None];
                };

                let (ui, message) = match &result {
                    SubmissionResult::Success(payload) => {
                        (UiState::Succeeded, env.feedback.success_message(payload))
                    },
                    SubmissionResult::Failure(error) => {
                        tracing::warn!(
                            %id,
                            status = error.status(),
                            error = %error,
                            "Submission failed"
                        );
                        (UiState::Failed, env.feedback.failure_message(error))
                    },
                };

                let settlement = Settlement {
                    id,
                    state: ui,
                    result,
                    started_at: in_flight.started_at,
                    settled_at: env.clock.now(),
                };

                tracing::debug!(%id, state = %ui, "Submission settled");
                metrics::counter!("submission.settled", "outcome" => ui.to_string()).increment(1);
                if let Ok(elapsed) = (settlement.settled_at - settlement.started_at).to_std() {
                    metrics::histogram!("submission.duration_seconds").record(elapsed.as_secs_f64());
                }

                state.ui = ui;
                state.in_flight = Some(InFlight {
                    rendering: true,
                    ..in_flight
                });
                state.message = Some(message.clone());
                state.last_settlement = Some(settlement.clone());

                smallvec![render_effect(settlement, message, Arc::clone(&env.port))]
            },

            LifecycleAction::Released { settlement } => {
                if state.in_flight.is_some_and(|in_flight| in_flight.id == settlement.id) {
                    state.in_flight = None;
                }
                tracing::debug!(id = %settlement.id, state = %settlement.state, "Control released");
                smallvec![Effect::None]
            },

            LifecycleAction::Rejected { id } => {
                tracing::debug!(%id, "Rejection delivered");
                smallvec![Effect::None]
            },
        }
    }
}

/// Show the busy state, POST, and report the outcome
///
/// The guard releases the control if this future panics or is dropped
/// before an outcome exists. Once `Settled` is produced, the render effect
/// owns the release.
fn request_effect(
    id: SubmissionId,
    request: SubmissionRequest,
    env: &LifecycleEnvironment,
) -> Effect<LifecycleAction> {
    let transport = Arc::clone(&env.transport);
    let port = Arc::clone(&env.port);
    let feedback = Arc::clone(&env.feedback);

    async_effect! {
        port.set_pending(feedback.busy_label());
        let guard = ReleaseGuard::new(Arc::clone(&port));

        let outcome = AssertUnwindSafe(transport.post_json(&request))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => SubmissionResult::from(result),
            Err(_) => {
                tracing::error!(%id, "Request panicked before producing an outcome");
                SubmissionResult::Failure(SubmissionError::Network(
                    "Request aborted".to_string(),
                ))
            },
        };

        guard.disarm();
        Some(LifecycleAction::Settled { id, result })
    }
}

/// Put the outcome on screen, then release the control
fn render_effect(
    settlement: Settlement,
    message: String,
    port: Arc<dyn PresentationPort>,
) -> Effect<LifecycleAction> {
    async_effect! {
        let guard = ReleaseGuard::new(Arc::clone(&port));

        let rendered = std::panic::catch_unwind(AssertUnwindSafe(|| {
            if settlement.state == UiState::Succeeded {
                port.set_succeeded(&message);
                port.reset();
            } else {
                port.set_failed(&message);
            }
        }));
        if rendered.is_err() {
            tracing::error!(id = %settlement.id, "Presentation port panicked while rendering");
        }

        guard.release();
        Some(LifecycleAction::Released { settlement })
    }
}
