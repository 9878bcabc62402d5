//! Type system for Greyline
//!
//! This module contains:
//! - Payload value helpers
//! - Declarative rule definitions
//! - Rule evaluation results
//! - Advisory insights
//! - Final decisions

pub mod decision;
pub mod evaluation;
pub mod insight;
pub mod rule;
pub mod value;

pub use decision::{DecisionSource, FinalDecision, FinalVerdict};
pub use evaluation::{EvaluationStep, MatchedRule, RuleEvaluationResult, RuleOutcome};
pub use insight::{
    clamp_confidence, AdvisoryAnalysis, AiInsight, NotAnalyzed, NotAnalyzedReason,
    ProviderAttempt, Recommendation,
};
pub use rule::{validate_rule_set, ConditionDefinition, Operator, RuleDefinition, Verdict};
pub use value::Value;
