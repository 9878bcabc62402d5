//! Advisory configuration types

use crate::error::{LLMError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Provider wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormatKind {
    Gemini,
    Anthropic,
}

impl WireFormatKind {
    /// Public API base URL used when a provider sets no endpoint
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            WireFormatKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            WireFormatKind::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WireFormatKind::Gemini => "gemini",
            WireFormatKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for WireFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One advisory provider
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique name, used in logs, attempts and metrics
    pub name: String,

    /// API base URL; the format's public endpoint when empty
    #[serde(default)]
    pub endpoint: String,

    /// Inline credential
    #[serde(default, skip_serializing)]
    pub credential: Option<String>,

    /// Environment variable holding the credential
    #[serde(default)]
    pub credential_env: Option<String>,

    pub model: String,

    pub format: WireFormatKind,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .field("credential_env", &self.credential_env)
            .field("model", &self.model)
            .field("format", &self.format)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(
        name: impl Into<String>,
        format: WireFormatKind,
        model: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: String::new(),
            credential: Some(credential.into()),
            credential_env: None,
            model: model.into(),
            format,
        }
    }

    /// Set the API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Read the credential from an environment variable instead
    pub fn with_credential_env(mut self, var: impl Into<String>) -> Self {
        self.credential = None;
        self.credential_env = Some(var.into());
        self
    }

    /// Endpoint with any trailing slash removed
    pub fn effective_endpoint(&self) -> &str {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            self.format.default_endpoint()
        } else {
            endpoint.trim_end_matches('/')
        }
    }

    /// Inline credential, or the value of `credential_env`
    pub fn resolve_credential(&self) -> Result<String> {
        if let Some(credential) = self.credential.as_deref().filter(|c| !c.trim().is_empty()) {
            return Ok(credential.to_string());
        }

        if let Some(var) = &self.credential_env {
            return match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(LLMError::InvalidConfiguration(format!(
                    "provider '{}': environment variable {} is not set",
                    self.name, var
                ))),
            };
        }

        Err(LLMError::InvalidConfiguration(format!(
            "provider '{}': missing credential",
            self.name
        )))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LLMError::InvalidConfiguration(
                "provider name must not be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(LLMError::InvalidConfiguration(format!(
                "provider '{}': model must not be empty",
                self.name
            )));
        }
        reqwest::Url::parse(self.effective_endpoint()).map_err(|e| {
            LLMError::InvalidConfiguration(format!(
                "provider '{}': invalid endpoint '{}': {}",
                self.name, self.endpoint, e
            ))
        })?;
        self.resolve_credential()?;
        Ok(())
    }
}

/// Advisory layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum confidence for a recommendation to be trusted
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Providers in fallback order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl AdvisorConfig {
    /// Enabled configuration with default timeout and threshold
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::disabled()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            providers: Vec::new(),
        }
    }

    /// Append a provider (tried after those already added)
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(LLMError::InvalidConfiguration(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.timeout_ms == 0 {
            return Err(LLMError::InvalidConfiguration(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        // A disabled advisor never calls out, so its providers are not checked
        if !self.enabled {
            return Ok(());
        }

        if self.providers.is_empty() {
            return Err(LLMError::InvalidConfiguration(
                "advisory is enabled but no providers are configured".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !names.insert(provider.name.as_str()) {
                return Err(LLMError::InvalidConfiguration(format!(
                    "duplicate provider name '{}'",
                    provider.name
                )));
            }
        }

        Ok(())
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::disabled()
    }
}
