//! Advisory orchestration across providers
//!
//! Providers are tried strictly in configured order, one attempt each, every
//! attempt bounded by the per-call timeout. The first provider that returns
//! text wins, even if that text then fails to decode.

use crate::client::{LLMClient, LLMRequest};
use crate::config::AdvisorConfig;
use crate::error::{LLMError, Result};
use crate::extractor::parse_advisory_reply;
use crate::prompt::build_advisory_prompt;
use crate::provider::HttpProvider;
use greyline_core::{AiInsight, NotAnalyzedReason, ProviderAttempt, RuleEvaluationResult, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Provider name and model, for status reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

struct AdvisorProvider {
    name: String,
    model: String,
    client: Arc<dyn LLMClient>,
}

pub struct AiAdvisor {
    enabled: bool,
    timeout: Duration,
    confidence_threshold: f64,
    providers: Vec<AdvisorProvider>,
}

impl AiAdvisor {
    /// Build an advisor with HTTP providers from validated configuration
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        config.validate()?;

        let mut advisor = Self {
            enabled: config.enabled,
            timeout: config.timeout(),
            confidence_threshold: config.confidence_threshold,
            providers: Vec::new(),
        };
        if !config.enabled {
            return Ok(advisor);
        }

        let http = reqwest::Client::new();
        for provider in &config.providers {
            let client = HttpProvider::with_client(provider.clone(), http.clone())?;
            advisor = advisor.with_client(provider.model.clone(), Arc::new(client));
        }

        tracing::info!(
            "Advisory enabled with {} provider(s), timeout {} ms, threshold {}",
            advisor.providers.len(),
            config.timeout_ms,
            config.confidence_threshold
        );
        Ok(advisor)
    }

    /// Advisor that never calls out
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            timeout: Duration::from_millis(AdvisorConfig::disabled().timeout_ms),
            confidence_threshold: AdvisorConfig::disabled().confidence_threshold,
            providers: Vec::new(),
        }
    }

    /// Enabled advisor with no providers yet
    pub fn new(timeout: Duration, confidence_threshold: f64) -> Self {
        Self {
            enabled: true,
            timeout,
            confidence_threshold,
            providers: Vec::new(),
        }
    }

    /// Append a provider client; its `name()` identifies it in attempts
    pub fn with_client(mut self, model: impl Into<String>, client: Arc<dyn LLMClient>) -> Self {
        self.providers.push(AdvisorProvider {
            name: client.name().to_string(),
            model: model.into(),
            client,
        });
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|p| ProviderInfo {
                name: p.name.clone(),
                model: p.model.clone(),
            })
            .collect()
    }

    /// Analyze a grey-zone request
    pub async fn analyze(&self, input: &Value, rule_result: &RuleEvaluationResult) -> AiInsight {
        if !self.enabled {
            return AiInsight::not_analyzed(NotAnalyzedReason::AiDisabled);
        }

        let started = Instant::now();
        let prompt = build_advisory_prompt(input, rule_result);
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let call_started = Instant::now();
            let request = LLMRequest::new(prompt.clone(), provider.model.clone());
            let outcome = match tokio::time::timeout(self.timeout, provider.client.call(request)).await {
                Ok(result) => result,
                Err(_) => Err(LLMError::Timeout(self.timeout.as_millis() as u64)),
            };
            let latency_ms = elapsed_ms(call_started);

            match outcome {
                Ok(response) => {
                    attempts.push(ProviderAttempt {
                        provider: provider.name.clone(),
                        model: provider.model.clone(),
                        success: true,
                        latency_ms,
                        error: None,
                    });

                    let mut analysis = parse_advisory_reply(&response.content)
                        .with_provider(provider.name.as_str(), provider.model.as_str())
                        .with_threshold(self.confidence_threshold);
                    analysis.analysis_time_ms = elapsed_ms(started);
                    analysis.attempts = attempts;

                    tracing::info!(
                        "Advisory from '{}': {} (confidence {:.2}, meets threshold: {})",
                        provider.name,
                        analysis.recommendation,
                        analysis.confidence,
                        analysis.meets_confidence_threshold
                    );
                    return AiInsight::Analyzed(analysis);
                }
                Err(e) => {
                    tracing::warn!(
                        "Advisory provider '{}' failed after {:.1} ms: {}",
                        provider.name,
                        latency_ms,
                        e
                    );
                    attempts.push(ProviderAttempt {
                        provider: provider.name.clone(),
                        model: provider.model.clone(),
                        success: false,
                        latency_ms,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        tracing::warn!("All {} advisory providers failed", self.providers.len());
        AiInsight::all_providers_failed(elapsed_ms(started), attempts)
    }
}

impl std::fmt::Debug for AiAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiAdvisor")
            .field("enabled", &self.enabled)
            .field("timeout", &self.timeout)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("providers", &self.providers())
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
