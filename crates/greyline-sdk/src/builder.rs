//! Builder pattern for DecisionEngine

use crate::config::EngineConfig;
use crate::decision_engine::DecisionEngine;
use crate::error::Result;
use crate::loader::{load_rules_from_file, parse_rules};
use greyline_core::RuleDefinition;
use greyline_llm::{AdvisorConfig, AiAdvisor};
use greyline_runtime::{MetricsCollector, NoopTelemetry, RuleEngine, TelemetrySink};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for DecisionEngine
///
/// # Example
///
/// ```rust,ignore
/// use greyline_sdk::DecisionEngineBuilder;
///
/// // From a rule file, advisory disabled
/// let engine = DecisionEngineBuilder::new()
///     .with_rule_file("rules/default.yaml")
///     .build()?;
///
/// // Inline rules with a prebuilt advisor (tests)
/// let engine = DecisionEngineBuilder::new()
///     .add_rule_content(yaml_content)
///     .with_advisor(advisor)
///     .build()?;
/// ```
pub struct DecisionEngineBuilder {
    config: EngineConfig,
    rules: Vec<RuleDefinition>,
    rule_contents: Vec<String>,
    advisor: Option<AiAdvisor>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl DecisionEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::from_config(EngineConfig::new())
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            rules: Vec::new(),
            rule_contents: Vec::new(),
            advisor: None,
            telemetry: None,
        }
    }

    /// Set the rule file (also used by `reload_from_source`)
    pub fn with_rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rule_file = Some(path.into());
        self
    }

    /// Add one rule definition
    pub fn add_rule(mut self, rule: RuleDefinition) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add several rule definitions
    pub fn add_rules(mut self, rules: impl IntoIterator<Item = RuleDefinition>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Add rule source text (YAML or JSON)
    pub fn add_rule_content(mut self, content: impl Into<String>) -> Self {
        self.rule_contents.push(content.into());
        self
    }

    /// Set advisory configuration (providers are built on `build`)
    pub fn with_advisor_config(mut self, advisor: AdvisorConfig) -> Self {
        self.config.advisor = advisor;
        self
    }

    /// Use a prebuilt advisor instead of the configured one
    pub fn with_advisor(mut self, advisor: AiAdvisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Report to a custom telemetry sink
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Build the engine. Rule file definitions come first, then inline
    /// content, then individually added rules.
    pub fn build(self) -> Result<DecisionEngine> {
        let mut definitions = Vec::new();
        if let Some(path) = &self.config.rule_file {
            definitions.extend(load_rules_from_file(path)?);
        }
        for content in &self.rule_contents {
            definitions.extend(parse_rules(content)?);
        }
        definitions.extend(self.rules);

        let rules = RuleEngine::new(&definitions)?;

        let advisor = match self.advisor {
            Some(advisor) => advisor,
            None => AiAdvisor::from_config(&self.config.advisor)?,
        };

        let metrics = self
            .config
            .enable_metrics
            .then(|| Arc::new(MetricsCollector::new()));
        let telemetry: Arc<dyn TelemetrySink> = match (self.telemetry, &metrics) {
            (Some(telemetry), _) => telemetry,
            (None, Some(collector)) => Arc::clone(collector) as Arc<dyn TelemetrySink>,
            (None, None) => Arc::new(NoopTelemetry) as Arc<dyn TelemetrySink>,
        };

        tracing::info!(
            "DecisionEngine ready: {} rules, advisory {}",
            definitions.len(),
            if advisor.is_enabled() { "enabled" } else { "disabled" }
        );

        Ok(DecisionEngine::from_parts(
            rules,
            advisor,
            self.config.rule_file,
            telemetry,
            metrics,
        ))
    }
}

impl Default for DecisionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionEngine {
    /// Create a decision engine from configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        DecisionEngineBuilder::from_config(config).build()
    }
}
