//! Unit tests for DecisionEngine

use super::*;
use crate::builder::DecisionEngineBuilder;
use async_trait::async_trait;
use greyline_core::{ConditionDefinition, DecisionSource, FinalVerdict, Operator, RuleDefinition, Verdict};
use greyline_llm::{AiAdvisor, LLMClient, LLMRequest, LLMResponse, MockProvider};
use greyline_runtime::Metrics;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Provider that panics mid-call
struct PanickingProvider;

#[async_trait]
impl LLMClient for PanickingProvider {
    async fn call(&self, _request: LLMRequest) -> greyline_llm::Result<LLMResponse> {
        panic!("provider exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

fn deny_rule() -> RuleDefinition {
    RuleDefinition::new("DENY_001", "High risk", 1, Verdict::SafeDeny).with_condition(
        ConditionDefinition::new("signals.risk_score", Operator::Gt, json!(90)),
    )
}

fn grey_input() -> DecisionInput {
    DecisionInput::new(json!({"amount": 40}), json!({"risk_score": 50}))
}

#[test]
fn test_request_id_format() {
    let id = DecisionEngine::generate_request_id();
    let parts: Vec<_> = id.split('_').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "req");
    assert_eq!(parts[1].len(), 14);
    assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(parts[2].len(), 6);
    assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_caller_request_id_is_kept() {
    let engine = DecisionEngineBuilder::new().add_rule(deny_rule()).build().unwrap();
    let envelope = engine
        .decide(grey_input(), Some("caller-42".to_string()))
        .await;
    assert_eq!(envelope.request_id(), "caller-42");

    let generated = engine.decide(grey_input(), Some("  ".to_string())).await;
    assert!(generated.request_id().starts_with("req_"));
}

#[tokio::test]
async fn test_advisor_skipped_outside_grey_zone() {
    let mock = Arc::new(MockProvider::new());
    let engine = DecisionEngineBuilder::new()
        .add_rule(deny_rule())
        .with_advisor(AiAdvisor::new(Duration::from_secs(1), 0.7).with_client("m", mock.clone()))
        .build()
        .unwrap();

    let envelope = engine
        .decide(DecisionInput::new(json!({}), json!({"risk_score": 95})), None)
        .await;
    let response = envelope.as_success().unwrap();

    assert_eq!(response.decision.verdict, FinalVerdict::Deny);
    assert_eq!(response.meta.ai_status, Some(greyline_core::NotAnalyzedReason::NotGreyZone));
    assert!(response.ai_analysis.is_none());
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_panic_becomes_system_error() {
    let engine = DecisionEngineBuilder::new()
        .add_rule(deny_rule())
        .with_advisor(
            AiAdvisor::new(Duration::from_secs(1), 0.7)
                .with_client("m", Arc::new(PanickingProvider)),
        )
        .build()
        .unwrap();

    let envelope = engine.decide(grey_input(), Some("req_panic".to_string())).await;
    match &envelope {
        DecisionEnvelope::Error(error) => {
            assert_eq!(error.decision.verdict, FinalVerdict::Error);
            assert_eq!(error.decision.source, DecisionSource::SystemError);
            assert_eq!(error.error.request_id, "req_panic");
            assert!(error.error.message.contains("provider exploded"));
        }
        other => panic!("expected error envelope, got {:?}", other),
    }

    // The engine keeps serving after a failed request
    let next = engine
        .decide(DecisionInput::new(json!({}), json!({"risk_score": 99})), None)
        .await;
    assert_eq!(next.verdict(), FinalVerdict::Deny);
}

#[tokio::test]
async fn test_metrics_are_recorded() {
    let engine = DecisionEngineBuilder::new()
        .add_rule(deny_rule())
        .with_advisor(
            AiAdvisor::new(Duration::from_secs(1), 0.7).with_client(
                "m",
                Arc::new(
                    MockProvider::with_response(
                        r#"{"recommendation":"ALLOW","confidence":0.9}"#.to_string(),
                    )
                    .named("primary"),
                ),
            ),
        )
        .build()
        .unwrap();

    engine
        .decide(DecisionInput::new(json!({}), json!({"risk_score": 95})), None)
        .await;
    engine.decide(grey_input(), None).await;

    let metrics = engine.metrics().unwrap();
    assert_eq!(metrics.counter("decisions_total").get(), 2);
    assert_eq!(metrics.counter("decisions_by_source.RULE_ABSOLUTE").get(), 1);
    assert_eq!(metrics.counter("decisions_by_source.AI_RECOMMENDED").get(), 1);
    assert_eq!(metrics.counter("decisions_ai_used").get(), 1);
    assert_eq!(metrics.counter("rule_matches.DENY_001").get(), 1);
    assert_eq!(metrics.counter("rule_misses.DENY_001").get(), 1);
    assert_eq!(metrics.counter("ai_calls_success.primary").get(), 1);
    assert_eq!(metrics.histogram("decision_duration_seconds").count(), 2);

    let snapshot = engine.status().unwrap().metrics.unwrap();
    assert_eq!(snapshot.counters["decisions_total"], 2);
    let latency = snapshot.histograms["ai_call_duration_seconds.primary"];
    assert_eq!(latency.count, 1);
    assert!(latency.min <= latency.max);
}

#[test]
fn test_reload_from_source_without_file() {
    let engine = DecisionEngineBuilder::new().build().unwrap();
    assert!(matches!(
        engine.reload_from_source(),
        Err(crate::error::SdkError::ConfigError(_))
    ));
}

#[test]
fn test_status_reports_advisor() {
    let engine = DecisionEngineBuilder::new()
        .add_rule(deny_rule())
        .with_advisor(
            AiAdvisor::new(Duration::from_millis(1500), 0.8)
                .with_client("gemini-1.5-flash", Arc::new(MockProvider::new().named("primary"))),
        )
        .build()
        .unwrap();

    let status = engine.status().unwrap();
    assert_eq!(status.rule_count, 1);
    assert!(status.advisory_enabled);
    assert_eq!(status.confidence_threshold, 0.8);
    assert_eq!(status.advisory_timeout_ms, 1500);
    assert_eq!(status.providers[0].name, "primary");
    assert_eq!(status.providers[0].model, "gemini-1.5-flash");
}
