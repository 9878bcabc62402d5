//! Greyline Runtime - Rule evaluation engine
//!
//! This crate compiles declarative rule definitions into immutable snapshots,
//! evaluates them against request payloads, and provides the telemetry sink
//! the orchestrator reports into.

pub mod engine;
pub mod error;
pub mod observability;
pub mod snapshot;

// Re-export main types
pub use engine::{CompiledRule, Condition, ConditionWarning, ReloadReport, RuleEngine, RuleSet};
pub use error::{Result, RuntimeError};
pub use observability::{
    Counter, Histogram, HistogramSummary, Metrics, MetricsCollector, MetricsSnapshot,
    NoopTelemetry, TelemetrySink,
};
pub use snapshot::Snapshot;
