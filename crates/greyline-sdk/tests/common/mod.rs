//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use greyline_llm::{AiAdvisor, MockProvider};
use greyline_sdk::{DecisionEngine, DecisionEngineBuilder, DecisionInput};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Rules shared by the scenario tests
pub const SCENARIO_RULES: &str = r#"
rules:
  - id: DENY_001
    name: Very high risk score
    priority: 1
    outcome: SAFE_DENY
    conditions:
      - field: signals.risk_score
        operator: gt
        value: 90
  - id: ALLOW_001
    name: Low risk trusted device
    priority: 2
    outcome: SAFE_ALLOW
    conditions:
      - field: signals.risk_score
        operator: lt
        value: 20
      - field: signals.device_trusted
        operator: eq
        value: true
"#;

pub const THRESHOLD: f64 = 0.7;

/// Input with the given risk score and an untrusted device
pub fn input_with_score(score: i64) -> DecisionInput {
    DecisionInput::new(
        json!({"amount": 250, "currency": "USD"}),
        json!({"risk_score": score, "device_trusted": false}),
    )
}

pub fn input(request: Value, signals: Value) -> DecisionInput {
    DecisionInput::new(request, signals)
}

/// Advisor with one mock provider answering `reply`
pub fn advisor_replying(reply: &str) -> (AiAdvisor, Arc<MockProvider>) {
    let mock = Arc::new(MockProvider::with_response(reply.to_string()).named("primary"));
    let advisor = AiAdvisor::new(Duration::from_secs(2), THRESHOLD).with_client("mock-model", mock.clone());
    (advisor, mock)
}

/// Engine over the scenario rules with the given advisor
pub fn engine_with(advisor: AiAdvisor) -> DecisionEngine {
    DecisionEngineBuilder::new()
        .add_rule_content(SCENARIO_RULES)
        .with_advisor(advisor)
        .build()
        .expect("scenario engine builds")
}
