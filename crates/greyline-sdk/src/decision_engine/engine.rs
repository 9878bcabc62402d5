//! Decision orchestrator
//!
//! `decide` runs rule evaluation, the advisory stage (grey zone only) and
//! the combiner, then wraps the result in a response envelope. Any error or
//! panic inside those stages becomes an ERROR / SYSTEM_ERROR envelope.

use super::types::{DecisionEnvelope, DecisionInput, DecisionResponse, ErrorResponse, ResponseMeta};
use crate::combiner::DecisionCombiner;
use crate::error::{Result, SdkError};
use crate::loader::load_rules_from_file;
use futures::FutureExt;
use greyline_core::{
    AiInsight, FinalDecision, NotAnalyzedReason, RuleDefinition, RuleEvaluationResult,
};
use greyline_llm::{AdvisorConfig, AiAdvisor, ProviderInfo};
use greyline_runtime::{
    MetricsCollector, MetricsSnapshot, ReloadReport, RuleEngine, Snapshot, TelemetrySink,
};
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Read-only view of the active configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub rule_count: usize,
    pub rule_set_version: u64,
    pub rules_loaded_at: String,
    pub condition_warnings: usize,
    pub advisory_enabled: bool,
    pub confidence_threshold: f64,
    pub advisory_timeout_ms: u64,
    pub providers: Vec<ProviderInfo>,
    /// Counters and latency aggregates, when metrics are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
}

/// Output of the three pipeline stages
struct Stages {
    rule_result: RuleEvaluationResult,
    insight: AiInsight,
    decision: FinalDecision,
}

pub struct DecisionEngine {
    /// Rule snapshot holder
    rules: RuleEngine,

    /// Advisor snapshot
    advisor: Snapshot<AiAdvisor>,

    /// Where rules are re-read from on `reload_from_source`
    rule_source: Option<PathBuf>,

    telemetry: Arc<dyn TelemetrySink>,

    /// Metrics collector, when metrics are enabled
    metrics: Option<Arc<MetricsCollector>>,
}

impl DecisionEngine {
    /// Generate a unique request ID
    /// Format: req_YYYYMMDDHHmmss_xxxxxx
    /// Example: req_20231209143052_a3f2e1
    pub fn generate_request_id() -> String {
        use chrono::Utc;
        use rand::Rng;

        let datetime_str = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let random: u32 = rand::thread_rng().gen_range(0..=0xFFFFFF);

        format!("req_{}_{:06x}", datetime_str, random)
    }

    pub(crate) fn from_parts(
        rules: RuleEngine,
        advisor: AiAdvisor,
        rule_source: Option<PathBuf>,
        telemetry: Arc<dyn TelemetrySink>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            rules,
            advisor: Snapshot::new(advisor),
            rule_source,
            telemetry,
            metrics,
        }
    }

    /// Decide on one request. Never fails: pipeline errors come back as an
    /// error envelope carrying the request id.
    pub async fn decide(&self, input: DecisionInput, request_id: Option<String>) -> DecisionEnvelope {
        let request_id = request_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| {
                let new_id = Self::generate_request_id();
                tracing::debug!("Generated new request_id: {}", new_id);
                new_id
            });
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.run_stages(&input))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(SdkError::PipelineError(panic_message(panic))));
        let elapsed = started.elapsed();

        match outcome {
            Ok(stages) => {
                let ai_used = stages.insight.is_analyzed();
                self.telemetry.record_decision(
                    stages.decision.verdict.as_str(),
                    stages.decision.source.as_str(),
                    ai_used,
                    elapsed,
                );
                tracing::info!(
                    "Decision {}: {} ({}) rule outcome {}",
                    request_id,
                    stages.decision.verdict.as_str(),
                    stages.decision.source,
                    stages.rule_result.outcome.as_str()
                );

                let ai_status = match &stages.insight {
                    AiInsight::Analyzed(_) => None,
                    AiInsight::NotAnalyzed(n) => Some(n.reason),
                };
                DecisionEnvelope::Success(DecisionResponse {
                    decision: stages.decision,
                    rule_evaluation: stages.rule_result,
                    ai_analysis: stages.insight.analysis().cloned(),
                    meta: ResponseMeta {
                        processing_time_ms: elapsed.as_secs_f64() * 1000.0,
                        request_id,
                        ai_status,
                    },
                })
            }
            Err(e) => {
                tracing::error!("Decision pipeline failed for {}: {}", request_id, e);
                let decision = FinalDecision::system_error();
                self.telemetry.record_decision(
                    decision.verdict.as_str(),
                    decision.source.as_str(),
                    false,
                    elapsed,
                );
                DecisionEnvelope::Error(ErrorResponse::new(e.to_string(), request_id))
            }
        }
    }

    async fn run_stages(&self, input: &DecisionInput) -> Result<Stages> {
        let payload = input.to_payload();

        // Stage 1: rules
        let rule_result = self.rules.evaluate(&payload)?;
        for step in &rule_result.evaluation_path {
            self.telemetry.record_rule(&step.rule_id, step.matched);
        }
        tracing::debug!(
            "Rule evaluation: {} in {:.3} ms ({} rules tried)",
            rule_result.outcome.as_str(),
            rule_result.evaluation_time_ms,
            rule_result.evaluation_path.len()
        );

        // Stage 2: advisory, grey zone only
        let insight = if rule_result.is_grey_zone() {
            let advisor = self.advisor.load()?;
            if advisor.is_enabled() {
                let insight = advisor.analyze(&payload, &rule_result).await;
                for attempt in insight.attempts() {
                    self.telemetry.record_advisory_call(
                        &attempt.provider,
                        attempt.success,
                        Duration::from_secs_f64(attempt.latency_ms.max(0.0) / 1000.0),
                    );
                }
                insight
            } else {
                AiInsight::not_analyzed(NotAnalyzedReason::AiDisabled)
            }
        } else {
            AiInsight::not_analyzed(NotAnalyzedReason::NotGreyZone)
        };

        // Stage 3: combine
        let decision = DecisionCombiner::combine(&rule_result, &insight);

        Ok(Stages {
            rule_result,
            insight,
            decision,
        })
    }

    /// Validate and atomically install a replacement rule set
    pub fn reload_rules(&self, definitions: &[RuleDefinition]) -> Result<ReloadReport> {
        Ok(self.rules.reload(definitions)?)
    }

    /// Re-read the configured rule file and install it
    pub fn reload_from_source(&self) -> Result<ReloadReport> {
        let path = self.rule_source.as_ref().ok_or_else(|| {
            SdkError::ConfigError("No rule file configured. Cannot reload.".to_string())
        })?;

        tracing::info!("Reloading rules from {:?}", path);
        let definitions = load_rules_from_file(path)?;
        self.reload_rules(&definitions)
    }

    /// Validate and atomically install a new advisory configuration
    pub fn reload_advisor(&self, config: &AdvisorConfig) -> Result<()> {
        let advisor = AiAdvisor::from_config(config).map_err(|e| {
            tracing::warn!("Rejected advisor reload, keeping previous configuration: {}", e);
            e
        })?;
        self.replace_advisor(advisor)
    }

    /// Install an already built advisor
    pub fn replace_advisor(&self, advisor: AiAdvisor) -> Result<()> {
        let enabled = advisor.is_enabled();
        let providers = advisor.providers().len();
        self.advisor.store(Arc::new(advisor))?;
        tracing::info!(
            "✓ Advisor reloaded: enabled={}, {} provider(s)",
            enabled,
            providers
        );
        Ok(())
    }

    pub fn status(&self) -> Result<EngineStatus> {
        let rules = self.rules.snapshot()?;
        let advisor = self.advisor.load()?;

        Ok(EngineStatus {
            rule_count: rules.len(),
            rule_set_version: rules.version(),
            rules_loaded_at: rules.loaded_at().to_rfc3339(),
            condition_warnings: rules.warnings().len(),
            advisory_enabled: advisor.is_enabled(),
            confidence_threshold: advisor.confidence_threshold(),
            advisory_timeout_ms: advisor.timeout().as_millis() as u64,
            providers: advisor.providers(),
            metrics: self.metrics.as_ref().map(|m| m.snapshot()),
        })
    }

    /// Rule engine, for direct evaluation
    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rules
    }

    /// Metrics collector, when metrics are enabled
    pub fn metrics(&self) -> Option<Arc<MetricsCollector>> {
        self.metrics.clone()
    }
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("rules", &self.rules)
            .field("rule_source", &self.rule_source)
            .field("metrics_enabled", &self.metrics.is_some())
            .finish()
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic in decision pipeline: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic in decision pipeline: {}", message)
    } else {
        "panic in decision pipeline".to_string()
    }
}
