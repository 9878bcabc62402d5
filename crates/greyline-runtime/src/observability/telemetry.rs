//! Decision telemetry sink
//!
//! The orchestrator reports every decision, every rule it visited and every
//! advisory call through a `TelemetrySink`. Reporting must never fail a
//! decision, so the trait methods return nothing.

use super::metrics::{Metrics, MetricsCollector};
use std::time::Duration;

pub trait TelemetrySink: Send + Sync {
    /// One finished decision
    fn record_decision(&self, outcome: &str, source: &str, ai_used: bool, duration: Duration);

    /// One visited rule, matched or not
    fn record_rule(&self, rule_id: &str, matched: bool);

    /// One advisory provider attempt
    fn record_advisory_call(&self, provider: &str, success: bool, duration: Duration);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn record_decision(&self, _outcome: &str, _source: &str, _ai_used: bool, _duration: Duration) {}

    fn record_rule(&self, _rule_id: &str, _matched: bool) {}

    fn record_advisory_call(&self, _provider: &str, _success: bool, _duration: Duration) {}
}

impl TelemetrySink for MetricsCollector {
    fn record_decision(&self, outcome: &str, source: &str, ai_used: bool, duration: Duration) {
        self.counter("decisions_total").inc();
        self.counter(&format!("decisions_by_outcome.{}", outcome)).inc();
        self.counter(&format!("decisions_by_source.{}", source)).inc();
        if ai_used {
            self.counter("decisions_ai_used").inc();
        }
        self.histogram("decision_duration_seconds")
            .observe_duration(duration);
    }

    fn record_rule(&self, rule_id: &str, matched: bool) {
        let name = if matched {
            format!("rule_matches.{}", rule_id)
        } else {
            format!("rule_misses.{}", rule_id)
        };
        self.counter(&name).inc();
    }

    fn record_advisory_call(&self, provider: &str, success: bool, duration: Duration) {
        let name = if success {
            format!("ai_calls_success.{}", provider)
        } else {
            format!("ai_calls_failure.{}", provider)
        };
        self.counter(&name).inc();
        self.histogram(&format!("ai_call_duration_seconds.{}", provider))
            .observe_duration(duration);
    }
}
