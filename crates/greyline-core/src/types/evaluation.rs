//! Rule evaluation results and audit trail

use crate::types::Verdict;
use serde::{Deserialize, Serialize};

/// Outcome of a rule evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleOutcome {
    SafeAllow,
    SafeDeny,
    /// No rule matched
    GreyZone,
}

impl RuleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOutcome::SafeAllow => "SAFE_ALLOW",
            RuleOutcome::SafeDeny => "SAFE_DENY",
            RuleOutcome::GreyZone => "GREY_ZONE",
        }
    }
}

impl From<Verdict> for RuleOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::SafeAllow => RuleOutcome::SafeAllow,
            Verdict::SafeDeny => RuleOutcome::SafeDeny,
        }
    }
}

/// Summary of the rule that decided an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRule {
    pub id: String,
    pub name: String,
    pub priority: i64,
    pub outcome: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// One entry of the evaluation path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationStep {
    pub rule_id: String,
    pub matched: bool,
    pub reason: String,
}

impl EvaluationStep {
    pub fn new(rule_id: impl Into<String>, matched: bool, reason: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            matched,
            reason: reason.into(),
        }
    }
}

/// Result of evaluating the active rule set against one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluationResult {
    pub outcome: RuleOutcome,
    pub matched_rule: Option<MatchedRule>,
    pub evaluation_path: Vec<EvaluationStep>,
    pub evaluation_time_ms: f64,
}

impl RuleEvaluationResult {
    /// Grey-zone result with the given path
    pub fn grey_zone(evaluation_path: Vec<EvaluationStep>) -> Self {
        Self {
            outcome: RuleOutcome::GreyZone,
            matched_rule: None,
            evaluation_path,
            evaluation_time_ms: 0.0,
        }
    }

    /// Result decided by `rule`
    pub fn matched(rule: MatchedRule, evaluation_path: Vec<EvaluationStep>) -> Self {
        Self {
            outcome: rule.outcome.into(),
            matched_rule: Some(rule),
            evaluation_path,
            evaluation_time_ms: 0.0,
        }
    }

    pub fn with_time_ms(mut self, evaluation_time_ms: f64) -> Self {
        self.evaluation_time_ms = evaluation_time_ms;
        self
    }

    pub fn is_grey_zone(&self) -> bool {
        self.outcome == RuleOutcome::GreyZone
    }
}
