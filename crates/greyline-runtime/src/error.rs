//! Runtime error types

use greyline_core::CoreError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Rule set failed validation
    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(#[from] CoreError),

    /// A snapshot lock was poisoned by a panicking writer
    #[error("Snapshot unavailable: {0}")]
    SnapshotPoisoned(String),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
