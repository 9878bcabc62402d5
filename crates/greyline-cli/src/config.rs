//! Application configuration

use greyline_sdk::{AdvisorConfig, EngineConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, extension resolved by the `config` crate
pub const DEFAULT_CONFIG_FILE: &str = "config/greyline";

/// Environment prefix; nested keys use `__`, e.g. `GREYLINE__ADVISOR__ENABLED`
pub const ENV_PREFIX: &str = "GREYLINE";

/// Binary configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Rule file (YAML or JSON)
    #[serde(default)]
    pub rule_file: Option<PathBuf>,

    /// Advisory layer
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Enable metrics
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

fn default_enable_metrics() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rule_file: None,
            advisor: AdvisorConfig::disabled(),
            enable_metrics: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the config file and environment variables.
    ///
    /// `path` replaces the default `config/greyline` file. An explicit path must
    /// exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    /// Engine configuration, with an optional rule file override
    pub fn into_engine_config(self, rule_file: Option<PathBuf>) -> EngineConfig {
        let config = EngineConfig::new()
            .with_advisor(self.advisor)
            .enable_metrics(self.enable_metrics);

        match rule_file.or(self.rule_file) {
            Some(path) => config.with_rule_file(path),
            None => config,
        }
    }
}
