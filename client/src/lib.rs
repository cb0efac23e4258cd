//! # Formflow Client
//!
//! JSON-over-HTTP client used by form submissions.
//!
//! ## Example
//!
//! ```no_run
//! use formflow_client::{ApiClient, ApiConfig, ApiTransport, WaitlistSignup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL and optional API key from FORMFLOW_API_URL / FORMFLOW_API_KEY
//!     let config = ApiConfig::from_env()?;
//!     let client = ApiClient::new(&config);
//!
//!     let request = config.request(&WaitlistSignup::new("a@b.com"))?;
//!     let response = client.post_json(&request).await?;
//!
//!     println!("Position: {:?}", response.get("position"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Explicit configuration value (base URL, API key)
//! - Payload validation: flat JSON objects of primitive values
//! - Typed payloads for the waitlist, decision and risk endpoints
//! - Two-kind failure taxonomy: network vs server

pub mod client;
pub mod config;
pub mod error;
pub mod payloads;
pub mod request;

// Re-export main types for convenience
pub use client::{ApiClient, ApiTransport, TransportFuture};
pub use config::ApiConfig;
pub use error::{ClientError, SubmissionError};
pub use payloads::{
    ApiPayload, DecisionEvaluation, DecisionOutcome, ExecutionCheck, ExecutionVerdict,
    RiskAssessment, RiskReport, WaitlistPosition, WaitlistSignup,
};
pub use request::{Payload, SubmissionRequest, SubmissionResult};

/// Re-exported so callers can build endpoints without a direct `url` dependency
pub use reqwest::Url;
