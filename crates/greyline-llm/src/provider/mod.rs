//! Advisory provider implementations
//!
//! Each provider family differs only in how a prompt is shaped into an HTTP
//! request and how the reply text is pulled back out. That shaping lives
//! behind `WireFormat`; `HttpProvider` does the transport for all of them.

use crate::config::{ProviderConfig, WireFormatKind};
use crate::error::Result;
use serde_json::Value;

mod anthropic;
mod gemini;
mod http;
mod mock;

pub use anthropic::AnthropicFormat;
pub use gemini::GeminiFormat;
pub use http::HttpProvider;
pub use mock::{MockProvider, MockReply};

/// A fully shaped provider request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequestSpec {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Provider request/reply shaping
pub trait WireFormat: Send + Sync {
    /// Build the HTTP request for one prompt
    fn build_request(
        &self,
        provider: &ProviderConfig,
        credential: &str,
        prompt: &str,
    ) -> HttpRequestSpec;

    /// Extract the reply text from a decoded response body
    fn parse_reply(&self, body: &Value) -> Result<String>;
}

/// Wire format for a configured format kind
pub fn wire_format(kind: WireFormatKind) -> Box<dyn WireFormat> {
    match kind {
        WireFormatKind::Gemini => Box::new(GeminiFormat),
        WireFormatKind::Anthropic => Box::new(AnthropicFormat::default()),
    }
}
