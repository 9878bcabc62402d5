//! Configuration types for DecisionEngine

use greyline_llm::AdvisorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rule file path (YAML or JSON)
    #[serde(default)]
    pub rule_file: Option<PathBuf>,

    /// Advisory configuration
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Enable metrics collection
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

fn default_enable_metrics() -> bool {
    true
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            rule_file: None,
            advisor: AdvisorConfig::disabled(),
            enable_metrics: true,
        }
    }

    /// Set the rule file
    pub fn with_rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_file = Some(path.into());
        self
    }

    /// Set advisory configuration
    pub fn with_advisor(mut self, advisor: AdvisorConfig) -> Self {
        self.advisor = advisor;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
