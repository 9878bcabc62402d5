//! Google Gemini wire format

use super::{HttpRequestSpec, WireFormat};
use crate::config::ProviderConfig;
use crate::error::{LLMError, Result};
use serde_json::{json, Value};

/// Gemini `generateContent` request/reply shaping
#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiFormat;

impl WireFormat for GeminiFormat {
    fn build_request(
        &self,
        provider: &ProviderConfig,
        credential: &str,
        prompt: &str,
    ) -> HttpRequestSpec {
        let url = format!(
            "{}/models/{}:generateContent",
            provider.effective_endpoint(),
            provider.model
        );

        HttpRequestSpec {
            url,
            headers: vec![
                ("x-goog-api-key".to_string(), credential.to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: json!({
                "contents": [{
                    "parts": [{"text": prompt}]
                }]
            }),
        }
    }

    fn parse_reply(&self, body: &Value) -> Result<String> {
        if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
            return Err(LLMError::SafetyBlocked(reason.to_string()));
        }

        let candidate = &body["candidates"][0];
        if candidate["finishReason"].as_str() == Some("SAFETY") {
            return Err(LLMError::SafetyBlocked("SAFETY".to_string()));
        }

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LLMError::EmptyReply);
        }
        Ok(text)
    }
}
