//! Scriptable provider for tests

use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::{LLMError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(String),
    /// Sleep, then answer with the text
    Delayed(Duration, String),
}

/// Mock provider. Queued replies are consumed in order; once the queue is
/// empty every call answers with the default response.
pub struct MockProvider {
    name: String,
    default_response: String,
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self::with_response(
            r#"{"recommendation":"REVIEW","confidence":0.5,"reasoning":"Mock advisory response"}"#
                .to_string(),
        )
    }

    /// Create with custom default response
    pub fn with_response(response: String) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: response,
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that fails every call
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        let provider = Self::new();
        provider.push(MockReply::Fail(message.clone()));
        // Keep failing after the queue drains
        Self {
            default_response: String::new(),
            ..provider
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Queue a reply
    pub fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Fail(message.into()));
        self
    }

    pub fn then_delay(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(MockReply::Delayed(delay, text.into()));
        self
    }

    /// Number of calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.prompt.clone());

        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        let content = match next {
            Some(MockReply::Text(text)) => text,
            Some(MockReply::Fail(message)) => return Err(LLMError::ApiCallFailed(message)),
            Some(MockReply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                text
            }
            None if self.default_response.is_empty() => return Err(LLMError::EmptyReply),
            None => self.default_response.clone(),
        };

        Ok(LLMResponse::new(content, request.model))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LLMRequest {
        LLMRequest::new("Test".to_string(), "mock-model".to_string())
    }

    #[tokio::test]
    async fn test_mock_provider_default_response() {
        let provider = MockProvider::new();
        let response = provider.call(request()).await.unwrap();
        assert!(response.content.contains("REVIEW"));
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_prompt().as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn test_mock_provider_script_order() {
        let provider = MockProvider::with_response("default".to_string())
            .then_fail("down")
            .then_reply("first");

        assert!(provider.call(request()).await.is_err());
        assert_eq!(provider.call(request()).await.unwrap().content, "first");
        assert_eq!(provider.call(request()).await.unwrap().content, "default");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_failing_provider_keeps_failing() {
        let provider = MockProvider::failing("offline").named("broken");
        assert!(provider.call(request()).await.is_err());
        assert!(provider.call(request()).await.is_err());
        assert_eq!(provider.name(), "broken");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_reply() {
        let provider = MockProvider::new().then_delay(Duration::from_secs(2), "late");
        let started = tokio::time::Instant::now();
        let response = provider.call(request()).await.unwrap();
        assert_eq!(response.content, "late");
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
