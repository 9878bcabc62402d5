//! Greyline Decision Engine SDK
//!
//! High-level API: deterministic rules first, advisory input for grey-zone
//! requests only, and a combiner that never lets advisory input reverse a
//! rule deny.

pub mod builder;
pub mod combiner;
pub mod config;
pub mod decision_engine;
pub mod error;
pub mod loader;

// Re-export main types
pub use builder::DecisionEngineBuilder;
pub use combiner::DecisionCombiner;
pub use config::EngineConfig;
pub use decision_engine::{
    DecisionEngine, DecisionEnvelope, DecisionInput, DecisionResponse, EngineStatus,
    ErrorResponse,
};
pub use error::{Result, SdkError};
pub use loader::{load_rules_from_file, parse_rules};

// Re-export commonly used types from dependencies
pub use greyline_core::{
    AiInsight, DecisionSource, FinalDecision, FinalVerdict, RuleDefinition, RuleOutcome, Value,
};
pub use greyline_llm::{AdvisorConfig, AiAdvisor, ProviderConfig, WireFormatKind};
pub use greyline_runtime::{ConditionWarning, MetricsCollector, ReloadReport, TelemetrySink};
