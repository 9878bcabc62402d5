//! Error types for Greyline Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid rule '{rule_id}': {message}")]
    InvalidRule { rule_id: String, message: String },

    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
}

impl CoreError {
    pub fn invalid_rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidRule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
