//! Error types for the submission client

use thiserror::Error;

/// Why a submission failed
///
/// Both kinds are terminal for a single attempt; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The request could not be sent, or the response could not be parsed
    #[error("Request failed: {0}")]
    Network(String),

    /// The API answered with a non-2xx status
    #[error("API error (status {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server {
        /// HTTP status code
        status: u16,
        /// Message field from the response body, if the server sent one
        detail: Option<String>,
    },
}

impl SubmissionError {
    /// Server-provided message, if any
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => detail.as_deref(),
            Self::Network(_) => None,
        }
    }

    /// HTTP status for server errors
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(_) => None,
        }
    }

    /// Whether the failure happened before a usable response arrived
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors building requests or reading results
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Base URL or endpoint is not an absolute http(s) URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending input
        url: String,
        /// Parser or validation message
        reason: String,
    },

    /// Payload did not serialize to a JSON object
    #[error("Payload must serialize to a JSON object: {0}")]
    InvalidPayload(String),

    /// Payload field holds an array or object
    #[error("Payload field '{0}' is not a primitive value")]
    NonPrimitiveField(String),

    /// Success payload did not match the requested type
    #[error("Response decoding failed: {0}")]
    Decode(String),
}
