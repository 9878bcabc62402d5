//! LLM client interface and types

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request to an advisory provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMRequest {
    /// The prompt to send to the provider
    pub prompt: String,

    /// Model identifier (e.g., "gemini-1.5-flash", "claude-3-5-haiku-latest")
    pub model: String,
}

impl LLMRequest {
    /// Create a new request
    pub fn new(prompt: String, model: String) -> Self {
        Self { prompt, model }
    }
}

/// Response from an advisory provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,
}

impl LLMResponse {
    /// Create a new response
    pub fn new(content: String, model: String) -> Self {
        Self { content, model }
    }
}

/// Async LLM client trait
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Call the provider with a request for text generation
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse>;

    /// Get the name of this client
    fn name(&self) -> &str;
}
