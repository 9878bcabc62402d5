//! DecisionEngine - Main API for making decisions
//!
//! The module is organized into:
//! - `types`: input and response envelope types
//! - `engine`: the orchestrator, reload entry points and status
//! - `tests`: unit tests (test-only)

mod engine;
mod types;

// Re-export public types
pub use engine::{DecisionEngine, EngineStatus};
pub use types::{
    DecisionEnvelope, DecisionInput, DecisionResponse, ErrorDetail, ErrorMeta, ErrorResponse,
    ResponseMeta,
};

// Tests module (only compiled in test mode)
#[cfg(test)]
mod tests;
