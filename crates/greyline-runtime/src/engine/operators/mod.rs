//! Operator execution modules
//!
//! This module applies compiled conditions to a request payload.

mod comparison;

pub(crate) use comparison::execute_compare;

use crate::engine::condition::Condition;
use greyline_core::types::value::{display_string, resolve_path, strict_equals};
use greyline_core::Value;

/// Result of checking one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConditionCheck {
    Pass,
    Fail(String),
    Malformed(String),
}

/// Check a single condition against the payload
pub(crate) fn check_condition(condition: &Condition, input: &Value) -> ConditionCheck {
    match condition {
        Condition::Invalid { reason, .. } => ConditionCheck::Malformed(reason.clone()),

        Condition::Presence { field, expected } => {
            let present = resolve_path(input, field).is_some();
            if present == *expected {
                ConditionCheck::Pass
            } else if *expected {
                ConditionCheck::Fail(format!("{} is absent", field))
            } else {
                ConditionCheck::Fail(format!("{} is present", field))
            }
        }

        _ => {
            // Every remaining operator needs the field to be present
            let field = condition.field();
            let Some(actual) = resolve_path(input, field) else {
                return ConditionCheck::Fail(format!("{} is absent", field));
            };

            let passed = match condition {
                Condition::Comparison { op, operand, .. } => execute_compare(actual, *op, operand),
                Condition::Membership { negated, set, .. } => {
                    let member = set.iter().any(|candidate| strict_equals(actual, candidate));
                    member != *negated
                }
                Condition::Pattern { regex, .. } => regex.is_match(&display_string(actual)),
                _ => false,
            };

            if passed {
                ConditionCheck::Pass
            } else {
                ConditionCheck::Fail(format!("{} not satisfied (actual {})", condition, actual))
            }
        }
    }
}
