//! Submission request and result types

use crate::error::{ClientError, SubmissionError};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A flat JSON object: field name to string, number, boolean or null
pub type Payload = serde_json::Map<String, Value>;

/// One POST to make on behalf of a user action
///
/// Built fresh per submission and dropped once the call completes.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionRequest {
    endpoint: Url,
    payload: Payload,
}

impl SubmissionRequest {
    /// Build a request from anything that serializes to a flat JSON object
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidPayload`] if `payload` is not a JSON object
    /// - [`ClientError::NonPrimitiveField`] if a field holds an array or object
    pub fn new<P: Serialize + ?Sized>(endpoint: Url, payload: &P) -> Result<Self, ClientError> {
        let value =
            serde_json::to_value(payload).map_err(|e| ClientError::InvalidPayload(e.to_string()))?;

        match value {
            Value::Object(map) => Self::from_map(endpoint, map),
            other => Err(ClientError::InvalidPayload(format!(
                "got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build a request from an already-assembled payload
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NonPrimitiveField`] if a field holds an array
    /// or object.
    pub fn from_map(endpoint: Url, payload: Payload) -> Result<Self, ClientError> {
        if let Some((field, _)) = payload
            .iter()
            .find(|(_, value)| value.is_array() || value.is_object())
        {
            return Err(ClientError::NonPrimitiveField(field.clone()));
        }

        Ok(Self { endpoint, payload })
    }

    /// Target URL
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Body fields
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Outcome of one submission, consumed once by the display layer
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionResult {
    /// 2xx with a JSON object body
    Success(Payload),
    /// Anything else
    Failure(SubmissionError),
}

impl SubmissionResult {
    /// Whether the submission succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Response body of a successful submission
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    /// Error of a failed submission
    #[must_use]
    pub const fn error(&self) -> Option<&SubmissionError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// A single response field, untouched
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload().and_then(|payload| payload.get(name))
    }

    /// Decode the success payload into a typed response
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] for failures or payloads that do not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        match self {
            Self::Success(payload) => serde_json::from_value(Value::Object(payload.clone()))
                .map_err(|e| ClientError::Decode(e.to_string())),
            Self::Failure(error) => Err(ClientError::Decode(format!(
                "submission failed: {error}"
            ))),
        }
    }
}

impl From<Result<Payload, SubmissionError>> for SubmissionResult {
    fn from(result: Result<Payload, SubmissionError>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(error) => Self::Failure(error),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint() -> Url {
        Url::parse("http://localhost:8001/waitlist/signup").unwrap()
    }

    #[test]
    fn test_accepts_primitive_fields() {
        let request = SubmissionRequest::new(
            endpoint(),
            &json!({"email": "a@b.com", "name": null, "amount": 5000, "vip": false}),
        )
        .unwrap();

        assert_eq!(request.payload().len(), 4);
        assert!(request.payload()["name"].is_null());
    }

    #[test]
    fn test_rejects_nested_fields() {
        let result = SubmissionRequest::new(endpoint(), &json!({"tags": ["a", "b"]}));
        assert_eq!(result, Err(ClientError::NonPrimitiveField("tags".to_string())));

        let result = SubmissionRequest::new(endpoint(), &json!({"meta": {"k": 1}}));
        assert_eq!(result, Err(ClientError::NonPrimitiveField("meta".to_string())));
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let result = SubmissionRequest::new(endpoint(), &json!([1, 2, 3]));
        assert!(matches!(result, Err(ClientError::InvalidPayload(_))));

        let result = SubmissionRequest::new(endpoint(), "just a string");
        assert!(matches!(result, Err(ClientError::InvalidPayload(_))));
    }

    #[test]
    fn test_result_field_access_is_unmodified() {
        let Value::Object(payload) = json!({"risk_score": 0.42, "risk_level": "MEDIUM"}) else {
            unreachable!()
        };
        let result = SubmissionResult::from(Ok(payload));

        assert!(result.is_success());
        assert_eq!(result.field("risk_score"), Some(&json!(0.42)));
        assert_eq!(result.field("risk_level"), Some(&json!("MEDIUM")));
        assert_eq!(result.field("missing"), None);
    }

    #[test]
    fn test_decode_failure_is_an_error() {
        let result = SubmissionResult::from(Err(SubmissionError::Network("offline".to_string())));

        assert!(!result.is_success());
        assert!(result.error().unwrap().is_network());
        assert!(matches!(
            result.decode::<serde_json::Value>(),
            Err(ClientError::Decode(_))
        ));
    }
}
