//! The request lifecycle controller

use crate::actions::LifecycleAction;
use crate::environment::LifecycleEnvironment;
use crate::error::LifecycleError;
use crate::message::Feedback;
use crate::reducer::LifecycleReducer;
use crate::state::{LifecycleState, Settlement, SubmissionId, UiState};
use formflow_client::{ApiClient, ApiConfig, ApiPayload, ApiTransport, SubmissionRequest};
use formflow_core::environment::{PresentationPort, TriggerEvent};
use formflow_runtime::{Store, StoreError};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default bound on how long `submit` waits for a submission to settle
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Store driving one controller
pub type LifecycleStore =
    Store<LifecycleState, LifecycleAction, LifecycleEnvironment, LifecycleReducer>;

/// Drives one HTTP POST per submission through the form's display states
///
/// Each submission:
/// 1. suppresses the trigger event's default action
/// 2. goes `Pending`: control disabled, busy label, message cleared
/// 3. POSTs the JSON payload
/// 4. on 2xx goes `Succeeded`, renders the success message, resets the form
/// 5. otherwise goes `Failed` and renders the server's message or a fallback
/// 6. always releases the control
///
/// A submission made while another is pending is rejected. Clones share
/// state, so a controller can be handed to several tasks.
///
/// # Example
///
/// ```ignore
/// let controller = RequestLifecycleController::production(
///     ApiConfig::from_env()?,
///     Arc::new(form_port),
///     Feedback::waitlist(),
/// );
///
/// let state = controller
///     .submit(&mut event, "/waitlist/signup", &WaitlistSignup::new(email))
///     .await?;
/// ```
#[derive(Clone)]
pub struct RequestLifecycleController {
    store: LifecycleStore,
    config: ApiConfig,
    next_id: Arc<AtomicU64>,
    settle_timeout: Duration,
}

impl RequestLifecycleController {
    /// Controller over an explicit transport
    #[must_use]
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn ApiTransport>,
        port: Arc<dyn PresentationPort>,
        feedback: Feedback,
    ) -> Self {
        Self::with_environment(config, LifecycleEnvironment::new(transport, port, feedback))
    }

    /// Controller POSTing over HTTP with [`ApiClient`]
    #[must_use]
    pub fn production(
        config: ApiConfig,
        port: Arc<dyn PresentationPort>,
        feedback: Feedback,
    ) -> Self {
        let transport = Arc::new(ApiClient::new(&config));
        Self::new(config, transport, port, feedback)
    }

    /// Controller over a fully assembled environment
    #[must_use]
    pub fn with_environment(config: ApiConfig, environment: LifecycleEnvironment) -> Self {
        Self {
            store: Store::new(LifecycleState::default(), LifecycleReducer, environment),
            config,
            next_id: Arc::new(AtomicU64::new(1)),
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    /// Bound how long `submit` waits for the outcome
    #[must_use]
    pub const fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// The configuration endpoints are resolved against
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Submit `payload` to `endpoint` and return the final display state
    ///
    /// `endpoint` is an absolute URL or a path under the configured base
    /// URL. Request failures end as [`UiState::Failed`], not as an error.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Client`]: invalid endpoint or payload; nothing shown
    /// - [`LifecycleError::AlreadyPending`]: another submission is in flight
    /// - [`LifecycleError::SettleTimeout`]: no outcome within the wait bound
    pub async fn submit<T, P>(
        &self,
        event: &mut T,
        endpoint: &str,
        payload: &P,
    ) -> Result<UiState, LifecycleError>
    where
        T: TriggerEvent + ?Sized,
        P: Serialize + ?Sized,
    {
        event.prevent_default();
        let request = SubmissionRequest::new(self.config.endpoint(endpoint)?, payload)?;
        Ok(self.run(request).await?.state)
    }

    /// Submit a typed payload to its well-known endpoint
    ///
    /// # Errors
    ///
    /// Same as [`RequestLifecycleController::submit`].
    pub async fn submit_payload<T, P>(
        &self,
        event: &mut T,
        payload: &P,
    ) -> Result<Settlement, LifecycleError>
    where
        T: TriggerEvent + ?Sized,
        P: ApiPayload,
    {
        event.prevent_default();
        let request = self.config.request(payload)?;
        self.run(request).await
    }

    /// Submit a prepared request and return the full settlement
    ///
    /// The settlement carries the response fields exactly as received.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::AlreadyPending`]: another submission is in flight
    /// - [`LifecycleError::SettleTimeout`]: no outcome within the wait bound
    pub async fn dispatch<T>(
        &self,
        event: &mut T,
        request: SubmissionRequest,
    ) -> Result<Settlement, LifecycleError>
    where
        T: TriggerEvent + ?Sized,
    {
        event.prevent_default();
        self.run(request).await
    }

    /// Current display state
    pub async fn state(&self) -> UiState {
        self.store.state(|s| s.ui).await
    }

    /// Message currently shown, if any
    pub async fn message(&self) -> Option<String> {
        self.store.state(|s| s.message.clone()).await
    }

    /// Most recent finished submission
    pub async fn last_settlement(&self) -> Option<Settlement> {
        self.store.state(|s| s.last_settlement.clone()).await
    }

    #[tracing::instrument(skip(self, request), fields(endpoint = %request.endpoint()))]
    async fn run(&self, request: SubmissionRequest) -> Result<Settlement, LifecycleError> {
        let id = SubmissionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        let terminal = self
            .store
            .send_and_wait_for(
                LifecycleAction::Submit { id, request },
                move |action| action.ends(id),
                self.settle_timeout,
            )
            .await
            .map_err(|e| match e {
                StoreError::Timeout => {
                    tracing::warn!(
                        %id,
                        timeout = ?self.settle_timeout,
                        "Gave up waiting for submission to settle"
                    );
                    LifecycleError::SettleTimeout(self.settle_timeout)
                },
                other => LifecycleError::Store(other),
            })?;

        match terminal {
            LifecycleAction::Released { settlement } => Ok(settlement),
            // Only Released and Rejected end a submission
            _ => Err(LifecycleError::AlreadyPending),
        }
    }
}

impl std::fmt::Debug for RequestLifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLifecycleController")
            .field("config", &self.config)
            .field("settle_timeout", &self.settle_timeout)
            .finish_non_exhaustive()
    }
}
