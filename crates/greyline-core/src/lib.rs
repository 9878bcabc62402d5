//! Greyline Core - Core types and definitions for the Greyline decision engine
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Value helpers for request/signal payloads
//! - Rule and condition definitions (the declarative rule source format)
//! - Rule evaluation results and audit trail
//! - Advisory insight and final decision types
//! - Error types

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use types::{
    AdvisoryAnalysis, AiInsight, ConditionDefinition, DecisionSource, EvaluationStep,
    FinalDecision, FinalVerdict, MatchedRule, NotAnalyzedReason, Operator, ProviderAttempt,
    Recommendation, RuleDefinition, RuleEvaluationResult, RuleOutcome, Value, Verdict,
};
