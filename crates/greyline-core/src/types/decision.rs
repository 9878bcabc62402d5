//! Final decision types

use crate::types::Recommendation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final verdict delivered to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinalVerdict {
    Allow,
    Deny,
    Review,
    /// Only produced by the orchestrator's failure boundary
    Error,
}

impl From<Recommendation> for FinalVerdict {
    fn from(recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::Allow => FinalVerdict::Allow,
            Recommendation::Deny => FinalVerdict::Deny,
            Recommendation::Review => FinalVerdict::Review,
        }
    }
}

impl FinalVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalVerdict::Allow => "ALLOW",
            FinalVerdict::Deny => "DENY",
            FinalVerdict::Review => "REVIEW",
            FinalVerdict::Error => "ERROR",
        }
    }
}

/// Which signal produced the final verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionSource {
    Rule,
    RuleAbsolute,
    AiRecommended,
    AiFlaggedReview,
    AiUnavailable,
    AiUncertain,
    SystemError,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Rule => "RULE",
            DecisionSource::RuleAbsolute => "RULE_ABSOLUTE",
            DecisionSource::AiRecommended => "AI_RECOMMENDED",
            DecisionSource::AiFlaggedReview => "AI_FLAGGED_REVIEW",
            DecisionSource::AiUnavailable => "AI_UNAVAILABLE",
            DecisionSource::AiUncertain => "AI_UNCERTAIN",
            DecisionSource::SystemError => "SYSTEM_ERROR",
        }
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    #[serde(rename = "final")]
    pub verdict: FinalVerdict,
    pub source: DecisionSource,
    pub confidence: Option<f64>,
}

impl FinalDecision {
    pub fn new(verdict: FinalVerdict, source: DecisionSource, confidence: Option<f64>) -> Self {
        Self {
            verdict,
            source,
            confidence,
        }
    }

    pub fn system_error() -> Self {
        Self::new(FinalVerdict::Error, DecisionSource::SystemError, None)
    }
}
