//! Typed payloads and responses for the known endpoints

use serde::{Deserialize, Serialize};

/// A payload with a well-known endpoint path
pub trait ApiPayload: Serialize {
    /// Path under the API base URL
    const PATH: &'static str;
}

/// Waitlist signup from the landing page form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistSignup {
    /// Address to notify at launch
    pub email: String,
    /// Optional display name, sent as `null` when absent
    pub name: Option<String>,
    /// Optional company, sent as `null` when absent
    pub company: Option<String>,
}

impl WaitlistSignup {
    /// Signup with only an email
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            company: None,
        }
    }

    /// Set the name; blank input stays `None`
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into());
        self
    }

    /// Set the company; blank input stays `None`
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = non_blank(company.into());
        self
    }
}

impl ApiPayload for WaitlistSignup {
    const PATH: &'static str = "/waitlist/signup";
}

/// Decision to be scored by the decision engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvaluation {
    /// Decision category, e.g. `FINANCIAL`, `STRATEGIC`, `OPERATIONAL`
    pub category: String,
    /// Amount involved
    pub amount: f64,
    /// Free-text description
    pub description: String,
}

impl DecisionEvaluation {
    /// Build an evaluation request
    #[must_use]
    pub fn new(category: impl Into<String>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount,
            description: description.into(),
        }
    }
}

impl ApiPayload for DecisionEvaluation {
    const PATH: &'static str = "/decisions/evaluate";
}

/// Risk scoring request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Amount involved
    pub amount: f64,
    /// Decision category
    pub category: String,
    /// Optional description, omitted from the body when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RiskAssessment {
    /// Build a risk request without description
    #[must_use]
    pub fn new(amount: f64, category: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            description: None,
        }
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }
}

impl ApiPayload for RiskAssessment {
    const PATH: &'static str = "/risk/assess";
}

/// Ask whether a task may run without a human in the loop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCheck {
    /// Task type, e.g. `operational` or `financial`
    pub task_type: String,
    /// `LOW`, `MEDIUM`, `HIGH` or `CRITICAL`
    pub risk_level: String,
}

impl ExecutionCheck {
    /// Build an execution check
    #[must_use]
    pub fn new(task_type: impl Into<String>, risk_level: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            risk_level: risk_level.into(),
        }
    }
}

impl ApiPayload for ExecutionCheck {
    const PATH: &'static str = "/autonomy/should-execute";
}

/// Waitlist signup response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistPosition {
    /// Echoed address
    #[serde(default)]
    pub email: Option<String>,
    /// Place in the queue
    #[serde(default)]
    pub position: Option<u64>,
    /// Queue length at signup time
    #[serde(default)]
    pub total: Option<u64>,
    /// Server-side message
    #[serde(default)]
    pub message: Option<String>,
}

/// Decision evaluation response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    /// Decision identifier, kept as the server sent it
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// `LOW`, `MEDIUM`, `HIGH` or `CRITICAL`
    #[serde(default)]
    pub risk_level: Option<String>,
    /// Whether the decision may be taken without a human
    #[serde(default)]
    pub ai_can_decide: Option<bool>,
}

/// Risk assessment response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Score between 0 and 1
    #[serde(default)]
    pub risk_score: Option<f64>,
    /// `LOW`, `MEDIUM`, `HIGH` or `CRITICAL`
    #[serde(default)]
    pub risk_level: Option<String>,
}

/// Execution check response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionVerdict {
    /// Whether the task may run autonomously
    #[serde(default)]
    pub should_execute: Option<bool>,
    /// Human-readable justification
    #[serde(default)]
    pub reason: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
