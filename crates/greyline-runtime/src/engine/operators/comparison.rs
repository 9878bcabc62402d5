//! Comparison operator execution

use crate::engine::condition::CompareOp;
use greyline_core::types::value::{as_number, strict_equals};
use greyline_core::Value;

/// Execute a comparison operation.
///
/// Ordered comparisons require both sides to be JSON numbers; anything else
/// is a non-match rather than an error.
pub(crate) fn execute_compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    match op {
        CompareOp::Eq => strict_equals(left, right),
        CompareOp::Neq => !strict_equals(left, right),
        CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => {
            let (Some(l), Some(r)) = (as_number(left), as_number(right)) else {
                tracing::debug!(
                    "Non-numeric comparison: {:?} {} {:?}, returning false",
                    left,
                    op.as_str(),
                    right
                );
                return false;
            };
            match op {
                CompareOp::Gt => l > r,
                CompareOp::Gte => l >= r,
                CompareOp::Lt => l < r,
                CompareOp::Lte => l <= r,
                CompareOp::Eq | CompareOp::Neq => false,
            }
        }
    }
}
