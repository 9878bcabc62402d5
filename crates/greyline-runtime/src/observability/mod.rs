//! Observability module
//!
//! In-process metrics and the telemetry sink the orchestrator reports to.

pub mod metrics;
pub mod telemetry;

pub use metrics::{Counter, Histogram, HistogramSummary, Metrics, MetricsCollector, MetricsSnapshot};
pub use telemetry::{NoopTelemetry, TelemetrySink};
