//! Greyline advisory integration
//!
//! This crate consults external language-model providers for grey-zone
//! requests:
//! - `AiAdvisor`: ordered provider fallback with a per-call timeout
//! - Wire formats for Gemini and Anthropic behind one `WireFormat` trait
//! - Prompt construction and reply extraction
//!
//! Advisory output is never authoritative; the decision combiner decides
//! how much weight it gets.

// Re-export core types
pub use advisor::{AiAdvisor, ProviderInfo};
pub use client::{LLMClient, LLMRequest, LLMResponse};
pub use config::{AdvisorConfig, ProviderConfig, WireFormatKind};
pub use error::{LLMError, Result};
pub use extractor::parse_advisory_reply;
pub use prompt::build_advisory_prompt;

// Re-export providers
pub use provider::{
    wire_format, AnthropicFormat, GeminiFormat, HttpProvider, HttpRequestSpec, MockProvider,
    MockReply, WireFormat,
};

pub mod advisor;
pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod prompt;
pub mod provider;
