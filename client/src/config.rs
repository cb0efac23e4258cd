//! API configuration
//!
//! The base URL and API key are plain values handed to whoever needs them,
//! never process-wide constants.

use crate::error::ClientError;
use crate::payloads::ApiPayload;
use crate::request::SubmissionRequest;
use reqwest::Url;

/// Base URL used when `FORMFLOW_API_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "FORMFLOW_API_URL";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "FORMFLOW_API_KEY";

/// Where submissions go and how they authenticate
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    api_key: Option<String>,
}

impl ApiConfig {
    /// Create a config for the given base URL, without an API key
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] unless `base_url` is an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_http_url(base_url)?,
            api_key: None,
        })
    }

    /// Create a config from `FORMFLOW_API_URL` and `FORMFLOW_API_KEY`
    ///
    /// The URL falls back to [`DEFAULT_BASE_URL`]; a blank key counts as
    /// no key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `FORMFLOW_API_URL` is not a
    /// valid http(s) URL.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let config = Self::new(&base_url)?;
        Ok(match api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        })
    }

    /// Attach an API key, sent as `X-API-Key`
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The configured base URL
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured API key, if any
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Resolve an endpoint
    ///
    /// Absolute http(s) URLs are used as given. Anything else is treated as
    /// a path under the base URL, keeping any path the base URL already has:
    /// `https://host/api` + `/risk/assess` → `https://host/api/risk/assess`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the result does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return parse_http_url(path);
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        parse_http_url(&format!("{base}/{path}"))
    }

    /// Build a request for a typed payload at its well-known path
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the endpoint or payload is invalid.
    pub fn request<P: ApiPayload>(&self, payload: &P) -> Result<SubmissionRequest, ClientError> {
        SubmissionRequest::new(self.endpoint(P::PATH)?, payload)
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn parse_http_url(input: &str) -> Result<Url, ClientError> {
    let url = Url::parse(input).map_err(|e| ClientError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl {
            url: input.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
