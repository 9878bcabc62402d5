//! End-to-end decision scenarios

mod common;

use common::*;
use greyline_core::{NotAnalyzedReason, Recommendation, RuleOutcome};
use greyline_llm::{AiAdvisor, MockProvider};
use greyline_sdk::{DecisionSource, FinalVerdict};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

// ===========================================
// Rule-decided requests
// ===========================================

#[tokio::test]
async fn test_high_risk_score_is_absolute_deny() {
    let (advisor, mock) = advisor_replying(r#"{"recommendation":"ALLOW","confidence":1.0}"#);
    let engine = engine_with(advisor);

    let envelope = engine.decide(input_with_score(95), None).await;
    let response = envelope.as_success().unwrap();

    assert_eq!(response.rule_evaluation.outcome, RuleOutcome::SafeDeny);
    assert_eq!(
        response.rule_evaluation.matched_rule.as_ref().unwrap().id,
        "DENY_001"
    );
    assert_eq!(response.decision.verdict, FinalVerdict::Deny);
    assert_eq!(response.decision.source, DecisionSource::RuleAbsolute);
    assert!(response.ai_analysis.is_none());
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_safe_allow_without_advisory() {
    let (advisor, mock) = advisor_replying(r#"{"recommendation":"DENY","confidence":0.99}"#);
    let engine = engine_with(advisor);

    let envelope = engine
        .decide(input(json!({}), json!({"risk_score": 5, "device_trusted": true})), None)
        .await;

    assert_eq!(envelope.verdict(), FinalVerdict::Allow);
    assert_eq!(envelope.decision().source, DecisionSource::Rule);
    assert_eq!(envelope.decision().confidence, Some(1.0));
    assert_eq!(mock.calls(), 0);
}

// ===========================================
// Grey zone
// ===========================================

#[tokio::test]
async fn test_grey_zone_confident_allow() {
    let (advisor, mock) = advisor_replying(
        r#"{"recommendation":"ALLOW","confidence":0.92,"reasoning":"Consistent history",
            "risk_factors":["new merchant"],"mitigating_factors":["long tenure"]}"#,
    );
    let engine = engine_with(advisor);

    let envelope = engine.decide(input_with_score(50), None).await;
    let response = envelope.as_success().unwrap();

    assert_eq!(response.rule_evaluation.outcome, RuleOutcome::GreyZone);
    assert_eq!(response.rule_evaluation.evaluation_path.len(), 2);
    assert_eq!(response.decision.verdict, FinalVerdict::Allow);
    assert_eq!(response.decision.source, DecisionSource::AiRecommended);
    assert_eq!(response.decision.confidence, Some(0.92));

    let analysis = response.ai_analysis.as_ref().unwrap();
    assert_eq!(analysis.recommendation, Recommendation::Allow);
    assert_eq!(analysis.provider, "primary");
    assert_eq!(analysis.risk_factors, vec!["new merchant"]);
    assert_eq!(mock.calls(), 1);

    // The prompt carries the rule trace
    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("DENY_001"));
    assert!(prompt.contains("ALLOW_001"));
}

#[tokio::test]
async fn test_grey_zone_low_confidence_is_uncertain() {
    let (advisor, _) = advisor_replying(r#"{"recommendation":"ALLOW","confidence":0.4}"#);
    let engine = engine_with(advisor);

    let envelope = engine.decide(input_with_score(50), None).await;
    assert_eq!(envelope.verdict(), FinalVerdict::Review);
    assert_eq!(envelope.decision().source, DecisionSource::AiUncertain);
}

#[tokio::test]
async fn test_grey_zone_advisory_disabled() {
    let engine = engine_with(AiAdvisor::disabled());

    let envelope = engine.decide(input_with_score(50), None).await;
    let response = envelope.as_success().unwrap();

    assert_eq!(response.decision.verdict, FinalVerdict::Review);
    assert_eq!(response.decision.source, DecisionSource::AiUnavailable);
    assert_eq!(response.decision.confidence, None);
    assert_eq!(response.meta.ai_status, Some(NotAnalyzedReason::AiDisabled));
}

#[tokio::test]
async fn test_grey_zone_all_providers_failing() {
    let primary = Arc::new(MockProvider::failing("connection refused").named("primary"));
    let backup = Arc::new(MockProvider::failing("503").named("backup"));
    let advisor = AiAdvisor::new(Duration::from_secs(1), THRESHOLD)
        .with_client("m1", primary.clone())
        .with_client("m2", backup.clone());
    let engine = engine_with(advisor);

    let envelope = engine.decide(input_with_score(50), None).await;
    let response = envelope.as_success().unwrap();

    assert_eq!(response.decision.verdict, FinalVerdict::Review);
    assert_eq!(response.decision.source, DecisionSource::AiUnavailable);
    assert_eq!(
        response.meta.ai_status,
        Some(NotAnalyzedReason::AllProvidersFailed)
    );
    assert_eq!(primary.calls(), 1);
    assert_eq!(backup.calls(), 1);
}

#[tokio::test]
async fn test_unparseable_reply_is_review_without_fallback() {
    let primary = Arc::new(MockProvider::with_response("not json".to_string()).named("primary"));
    let backup = Arc::new(
        MockProvider::with_response(r#"{"recommendation":"ALLOW","confidence":0.95}"#.to_string())
            .named("backup"),
    );
    let advisor = AiAdvisor::new(Duration::from_secs(1), THRESHOLD)
        .with_client("m1", primary)
        .with_client("m2", backup.clone());
    let engine = engine_with(advisor);

    let envelope = engine.decide(input_with_score(50), None).await;
    let response = envelope.as_success().unwrap();
    let analysis = response.ai_analysis.as_ref().unwrap();

    assert_eq!(analysis.recommendation, Recommendation::Review);
    assert_eq!(analysis.confidence, 0.0);
    assert_eq!(response.decision.verdict, FinalVerdict::Review);
    assert_eq!(backup.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_falls_back() {
    let slow = Arc::new(
        MockProvider::new()
            .named("slow")
            .then_delay(Duration::from_secs(60), r#"{"recommendation":"DENY","confidence":1}"#),
    );
    let fast = Arc::new(
        MockProvider::with_response(r#"{"recommendation":"DENY","confidence":0.8}"#.to_string())
            .named("fast"),
    );
    let advisor = AiAdvisor::new(Duration::from_millis(300), THRESHOLD)
        .with_client("m1", slow)
        .with_client("m2", fast);
    let engine = engine_with(advisor);

    let envelope = engine.decide(input_with_score(50), None).await;
    let response = envelope.as_success().unwrap();

    assert_eq!(response.decision.verdict, FinalVerdict::Deny);
    assert_eq!(response.decision.source, DecisionSource::AiRecommended);
    assert_eq!(response.ai_analysis.as_ref().unwrap().provider, "fast");
}

// ===========================================
// Envelope
// ===========================================

#[tokio::test]
async fn test_success_envelope_serialization() {
    let (advisor, _) = advisor_replying(r#"{"recommendation":"ALLOW","confidence":0.92}"#);
    let engine = engine_with(advisor);

    let envelope = engine
        .decide(input_with_score(50), Some("req_fixed".to_string()))
        .await;
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json["decision"]["final"], "ALLOW");
    assert_eq!(json["decision"]["source"], "AI_RECOMMENDED");
    assert_eq!(json["ruleEvaluation"]["outcome"], "GREY_ZONE");
    assert!(json["ruleEvaluation"]["evaluationPath"].is_array());
    assert_eq!(json["aiAnalysis"]["recommendation"], "ALLOW");
    assert_eq!(json["aiAnalysis"]["provider"], "primary");
    assert!(json["aiAnalysis"]["analysisTimeMs"].is_number());
    assert!(json["meta"]["processingTimeMs"].is_number());
    assert_eq!(json["meta"]["requestId"], "req_fixed");
}

#[tokio::test]
async fn test_repeated_decisions_are_stable() {
    let engine = engine_with(AiAdvisor::disabled());
    let first = engine.decide(input_with_score(95), None).await;

    for _ in 0..20 {
        let again = engine.decide(input_with_score(95), None).await;
        assert_eq!(again.decision(), first.decision());
        assert_eq!(
            again.as_success().unwrap().rule_evaluation.evaluation_path,
            first.as_success().unwrap().rule_evaluation.evaluation_path
        );
    }
}
