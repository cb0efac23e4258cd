//! User-facing message templates
//!
//! Templates use `{field}` placeholders filled from the response body. `{{`
//! and `}}` produce literal braces. A `{` without a closing `}` is kept as
//! text.

use formflow_client::{Payload, SubmissionError};
use serde_json::Value;
use std::fmt;

/// Rendered in place of a field the response does not carry
const MISSING_FIELD: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A message with `{field}` placeholders
#[derive(Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a template
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = parse(&source);
        Self { source, segments }
    }

    /// The template as written
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the placeholders, in order of appearance
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Fill placeholders from a response body
    ///
    /// Strings render without quotes, numbers and booleans as their JSON
    /// text, `null` as nothing. Missing fields render as `?`.
    #[must_use]
    pub fn render(&self, payload: &Payload) -> String {
        self.render_with(|name| payload.get(name).map(display_value))
    }

    /// Fill placeholders from an arbitrary lookup
    pub fn render_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(MISSING_FIELD),
                },
            }
        }
        out
    }
}

impl fmt::Debug for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageTemplate").field(&self.source).finish()
    }
}

impl From<&str> for MessageTemplate {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                text.push('{');
            },
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                text.push('}');
            },
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    name.push(next);
                }

                let field = name.trim();
                if closed && !field.is_empty() {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Field(field.to_string()));
                } else {
                    text.push('{');
                    text.push_str(&name);
                    if closed {
                        text.push('}');
                    }
                }
            },
            other => text.push(other),
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Everything a form shows while and after it submits
///
/// The failure template sees `{error}` (the server's message, or the
/// fallback) and `{status}` (empty for network failures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    busy_label: String,
    success: MessageTemplate,
    failure: MessageTemplate,
    fallback_error: String,
}

impl Feedback {
    /// Build feedback from its parts
    #[must_use]
    pub fn new(
        busy_label: impl Into<String>,
        success: impl Into<MessageTemplate>,
        failure: impl Into<MessageTemplate>,
        fallback_error: impl Into<String>,
    ) -> Self {
        Self {
            busy_label: busy_label.into(),
            success: success.into(),
            failure: failure.into(),
            fallback_error: fallback_error.into(),
        }
    }

    /// Landing page waitlist form
    #[must_use]
    pub fn waitlist() -> Self {
        Self::new(
            "Joining...",
            "✅ Thanks! You're #{position} on the waitlist. We'll notify you when we launch!",
            "⚠️ {error}. Please try again.",
            "Failed to join waitlist",
        )
    }

    /// Decision evaluation
    #[must_use]
    pub fn decision() -> Self {
        Self::new(
            "Evaluating...",
            "Decision {id}: risk {risk_level}, AI can decide: {ai_can_decide}",
            "⚠️ {error}. Please try again.",
            "Failed to evaluate decision",
        )
    }

    /// Risk assessment
    #[must_use]
    pub fn risk() -> Self {
        Self::new(
            "Assessing...",
            "Risk score {risk_score} ({risk_level})",
            "⚠️ {error}. Please try again.",
            "Failed to assess risk",
        )
    }

    /// Autonomous execution check
    #[must_use]
    pub fn autonomy() -> Self {
        Self::new(
            "Checking...",
            "Auto-execute: {should_execute}. {reason}",
            "⚠️ {error}. Please try again.",
            "Failed to check execution",
        )
    }

    /// Label shown on the control while pending
    #[must_use]
    pub fn busy_label(&self) -> &str {
        &self.busy_label
    }

    /// Fallback used when the failure carries no server message
    #[must_use]
    pub fn fallback_error(&self) -> &str {
        &self.fallback_error
    }

    /// Message for a successful response
    #[must_use]
    pub fn success_message(&self, payload: &Payload) -> String {
        self.success.render(payload)
    }

    /// Message for a failed submission
    #[must_use]
    pub fn failure_message(&self, error: &SubmissionError) -> String {
        let reason = error.detail().unwrap_or(&self.fallback_error);
        let status = error.status().map(|status| status.to_string()).unwrap_or_default();

        self.failure.render_with(|name| match name {
            "error" => Some(reason.to_string()),
            "status" => Some(status.clone()),
            _ => None,
        })
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(
            "Submitting...",
            "Submitted successfully",
            "{error}",
            "Request failed",
        )
    }
}
