//! Request/Response types for DecisionEngine

use greyline_core::{
    AdvisoryAnalysis, FinalDecision, FinalVerdict, NotAnalyzedReason, RuleEvaluationResult, Value,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Decision input: the request under evaluation and its precomputed signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionInput {
    #[serde(default = "empty_object")]
    pub request: Value,

    #[serde(default = "empty_object")]
    pub signals: Value,
}

impl DecisionInput {
    pub fn new(request: Value, signals: Value) -> Self {
        Self { request, signals }
    }

    /// The `{request, signals}` document rule paths resolve against
    pub fn to_payload(&self) -> Value {
        json!({
            "request": self.request,
            "signals": self.signals,
        })
    }
}

impl Default for DecisionInput {
    fn default() -> Self {
        Self::new(empty_object(), empty_object())
    }
}

/// Processing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub processing_time_ms: f64,
    pub request_id: String,
    /// Why the advisory stage produced no analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_status: Option<NotAnalyzedReason>,
}

/// Successful decision envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub decision: FinalDecision,
    pub rule_evaluation: RuleEvaluationResult,
    pub ai_analysis: Option<AdvisoryAnalysis>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub message: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMeta {
    pub version: String,
    pub timestamp: String,
}

/// Envelope produced when the pipeline fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub decision: FinalDecision,
    pub error: ErrorDetail,
    pub meta: ErrorMeta,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            decision: FinalDecision::system_error(),
            error: ErrorDetail {
                message: message.into(),
                request_id: request_id.into(),
            },
            meta: ErrorMeta {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }
}

/// What `decide` returns: always a decision object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecisionEnvelope {
    Success(DecisionResponse),
    Error(ErrorResponse),
}

impl DecisionEnvelope {
    pub fn decision(&self) -> &FinalDecision {
        match self {
            DecisionEnvelope::Success(response) => &response.decision,
            DecisionEnvelope::Error(response) => &response.decision,
        }
    }

    pub fn verdict(&self) -> FinalVerdict {
        self.decision().verdict
    }

    pub fn request_id(&self) -> &str {
        match self {
            DecisionEnvelope::Success(response) => &response.meta.request_id,
            DecisionEnvelope::Error(response) => &response.error.request_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DecisionEnvelope::Error(_))
    }

    pub fn as_success(&self) -> Option<&DecisionResponse> {
        match self {
            DecisionEnvelope::Success(response) => Some(response),
            DecisionEnvelope::Error(_) => None,
        }
    }
}
