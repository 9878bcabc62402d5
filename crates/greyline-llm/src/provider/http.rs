//! HTTP transport shared by every wire format

use super::{wire_format, WireFormat};
use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::config::ProviderConfig;
use crate::error::{LLMError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Provider that talks to a remote API over HTTP
pub struct HttpProvider {
    config: ProviderConfig,
    credential: String,
    format: Box<dyn WireFormat>,
    client: Client,
}

impl HttpProvider {
    /// Create a provider from its configuration. The credential is resolved once.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Self::with_client(config, Client::new())
    }

    /// Create with a shared HTTP client
    pub fn with_client(config: ProviderConfig, client: Client) -> Result<Self> {
        config.validate()?;
        let credential = config.resolve_credential()?;
        let format = wire_format(config.format);
        Ok(Self {
            config,
            credential,
            format,
            client,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl LLMClient for HttpProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        let spec = self
            .format
            .build_request(&self.config, &self.credential, &request.prompt);

        let mut builder = self.client.post(&spec.url).json(&spec.body);
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // Error text ends up in logs and decision attempts, so drop the URL
        let resp = builder.send().await.map_err(|e| {
            LLMError::ApiCallFailed(format!(
                "{} API call failed: {}",
                self.config.format,
                e.without_url()
            ))
        })?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(|e| {
            LLMError::ApiCallFailed(format!("Failed to read response: {}", e.without_url()))
        })?;

        if !status.is_success() {
            return Err(LLMError::ApiCallFailed(format!(
                "{} API error ({}): {}",
                self.config.format, status, resp_text
            )));
        }

        let resp_json: serde_json::Value = serde_json::from_str(&resp_text).map_err(|e| {
            LLMError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let content = self.format.parse_reply(&resp_json)?;
        Ok(LLMResponse::new(content, request.model))
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
