//! HTTP transport implementation

use crate::{
    config::ApiConfig,
    error::SubmissionError,
    request::{Payload, SubmissionRequest},
};
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`ApiTransport::post_json`]
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Payload, SubmissionError>> + Send + 'a>>;

/// Sends a submission and classifies the outcome
///
/// Abstracted so the lifecycle can run against a scripted transport in
/// tests.
pub trait ApiTransport: Send + Sync {
    /// POST the request payload as JSON
    ///
    /// Resolves to the response object on 2xx, otherwise to a
    /// [`SubmissionError`].
    fn post_json<'a>(&'a self, request: &'a SubmissionRequest) -> TransportFuture<'a>;
}

/// Body fields checked, in order, for a server-provided error message
const DETAIL_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// reqwest-backed transport
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_key: Option<String>,
}

impl ApiClient {
    /// Create a client for the given configuration
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_http_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key().map(str::to_string),
        }
    }

    /// POST a submission
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::Network`] when the request cannot be sent, the
    ///   body cannot be read, or a 2xx body is not a JSON object
    /// - [`SubmissionError::Server`] for any non-2xx status
    #[tracing::instrument(skip(self, request), fields(endpoint = %request.endpoint()))]
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<Payload, SubmissionError> {
        let mut builder = self
            .client
            .post(request.endpoint().clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request.payload());

        if let Some(api_key) = &self.api_key {
            builder = builder.header("X-API-Key", api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), "Response received");

        if status.is_success() {
            parse_object(&body)
        } else {
            Err(SubmissionError::Server {
                status: status.as_u16(),
                detail: server_detail(&body),
            })
        }
    }
}

impl ApiTransport for ApiClient {
    fn post_json<'a>(&'a self, request: &'a SubmissionRequest) -> TransportFuture<'a> {
        Box::pin(self.submit(request))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

fn parse_object(body: &str) -> Result<Payload, SubmissionError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(_) => Err(SubmissionError::Network(
            "Response parsing failed: expected a JSON object".to_string(),
        )),
        Err(e) => Err(SubmissionError::Network(format!(
            "Response parsing failed: {e}"
        ))),
    }
}

fn server_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    DETAIL_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .map(str::to_string)
}
