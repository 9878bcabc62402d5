//! Anthropic Messages API wire format

use super::{HttpRequestSpec, WireFormat};
use crate::config::ProviderConfig;
use crate::error::{LLMError, Result};
use serde_json::{json, Value};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic `messages` request/reply shaping
#[derive(Debug, Clone, Copy)]
pub struct AnthropicFormat {
    max_tokens: u32,
}

impl AnthropicFormat {
    pub fn new(max_tokens: u32) -> Self {
        Self { max_tokens }
    }
}

impl Default for AnthropicFormat {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

impl WireFormat for AnthropicFormat {
    fn build_request(
        &self,
        provider: &ProviderConfig,
        credential: &str,
        prompt: &str,
    ) -> HttpRequestSpec {
        HttpRequestSpec {
            url: format!("{}/messages", provider.effective_endpoint()),
            headers: vec![
                ("x-api-key".to_string(), credential.to_string()),
                ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: json!({
                "model": provider.model,
                "max_tokens": self.max_tokens,
                "messages": [{
                    "role": "user",
                    "content": prompt
                }]
            }),
        }
    }

    fn parse_reply(&self, body: &Value) -> Result<String> {
        let text = body["content"][0]["text"].as_str().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(LLMError::EmptyReply);
        }
        Ok(text.to_string())
    }
}
