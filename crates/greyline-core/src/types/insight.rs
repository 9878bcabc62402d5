//! Advisory insight types
//!
//! An insight is either an analysis produced by a provider or a record of why
//! no analysis is available. Both carry the ordered provider attempts so the
//! decision can be audited.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommendation returned by an advisory provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Allow,
    Deny,
    Review,
}

impl Recommendation {
    /// Case-insensitive parse of a provider-supplied label
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "ALLOW" => Some(Recommendation::Allow),
            "DENY" => Some(Recommendation::Deny),
            "REVIEW" => Some(Recommendation::Review),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Allow => "ALLOW",
            Recommendation::Deny => "DENY",
            Recommendation::Review => "REVIEW",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a confidence value into [0, 1]. Non-finite input maps to 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// One call to one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttempt {
    pub provider: String,
    pub model: String,
    pub success: bool,
    pub latency_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A completed advisory analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryAnalysis {
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub reasoning: String,
    pub risk_factors: Vec<String>,
    pub mitigating_factors: Vec<String>,
    pub provider: String,
    pub model: String,
    pub analysis_time_ms: f64,
    pub meets_confidence_threshold: bool,
    /// False when the provider reply could not be decoded
    pub valid_response: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attempts: Vec<ProviderAttempt>,
}

impl AdvisoryAnalysis {
    /// Create an analysis. The confidence is clamped.
    pub fn new(recommendation: Recommendation, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            recommendation,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            risk_factors: Vec::new(),
            mitigating_factors: Vec::new(),
            provider: String::new(),
            model: String::new(),
            analysis_time_ms: 0.0,
            meets_confidence_threshold: false,
            valid_response: true,
            attempts: Vec::new(),
        }
    }

    /// Fixed low-confidence analysis used when a reply cannot be decoded
    pub fn invalid_response() -> Self {
        let mut analysis = Self::new(Recommendation::Review, 0.0, "Invalid AI response");
        analysis.valid_response = false;
        analysis
    }

    pub fn with_factors(mut self, risk_factors: Vec<String>, mitigating_factors: Vec<String>) -> Self {
        self.risk_factors = risk_factors;
        self.mitigating_factors = mitigating_factors;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.provider = provider.into();
        self.model = model.into();
        self
    }

    /// Compute and attach the threshold flag
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.meets_confidence_threshold = self.confidence >= threshold;
        self
    }
}

/// Why no analysis is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotAnalyzedReason {
    /// Advisory layer is disabled
    AiDisabled,
    /// Rule outcome was not grey-zone, advisory stage skipped
    NotGreyZone,
    /// Every configured provider failed
    AllProvidersFailed,
}

impl NotAnalyzedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotAnalyzedReason::AiDisabled => "AI_DISABLED",
            NotAnalyzedReason::NotGreyZone => "NOT_GREY_ZONE",
            NotAnalyzedReason::AllProvidersFailed => "ALL_PROVIDERS_FAILED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotAnalyzed {
    pub reason: NotAnalyzedReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attempts: Vec<ProviderAttempt>,
}

/// Advisory insight attached to a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiInsight {
    Analyzed(AdvisoryAnalysis),
    NotAnalyzed(NotAnalyzed),
}

impl AiInsight {
    pub fn not_analyzed(reason: NotAnalyzedReason) -> Self {
        AiInsight::NotAnalyzed(NotAnalyzed {
            reason,
            analysis_time_ms: None,
            attempts: Vec::new(),
        })
    }

    pub fn all_providers_failed(analysis_time_ms: f64, attempts: Vec<ProviderAttempt>) -> Self {
        AiInsight::NotAnalyzed(NotAnalyzed {
            reason: NotAnalyzedReason::AllProvidersFailed,
            analysis_time_ms: Some(analysis_time_ms),
            attempts,
        })
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, AiInsight::Analyzed(_))
    }

    pub fn analysis(&self) -> Option<&AdvisoryAnalysis> {
        match self {
            AiInsight::Analyzed(analysis) => Some(analysis),
            AiInsight::NotAnalyzed(_) => None,
        }
    }

    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            AiInsight::Analyzed(analysis) => &analysis.attempts,
            AiInsight::NotAnalyzed(not_analyzed) => &not_analyzed.attempts,
        }
    }
}
