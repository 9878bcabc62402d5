//! Error types for the Greyline advisory module

use thiserror::Error;

/// Result type alias for advisory operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Advisory module errors
///
/// Every variant except `InvalidConfiguration` is a provider-level failure
/// that moves the advisor on to the next provider.
#[derive(Debug, Error)]
pub enum LLMError {
    /// External API call failed
    #[error("External API call failed: {0}")]
    ApiCallFailed(String),

    /// Provider did not answer within the configured timeout
    #[error("Provider timed out after {0} ms")]
    Timeout(u64),

    /// Provider refused to answer for safety reasons
    #[error("Provider blocked the prompt: {0}")]
    SafetyBlocked(String),

    /// Provider answered with no text
    #[error("Provider returned an empty reply")]
    EmptyReply,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid response format
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}
