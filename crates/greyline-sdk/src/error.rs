//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Rule compilation or snapshot error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] greyline_runtime::RuntimeError),

    /// Advisory configuration error
    #[error("Advisor error: {0}")]
    AdvisorError(#[from] greyline_llm::LLMError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML rule source error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON rule source error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid rule file
    #[error("Invalid rule file: {0}")]
    InvalidRuleFile(String),

    /// Failure inside the decision pipeline
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
