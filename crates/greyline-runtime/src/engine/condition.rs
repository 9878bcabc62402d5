//! Compiled conditions
//!
//! Condition definitions are compiled once per snapshot into a closed set of
//! variants. Anything that cannot be compiled becomes `Condition::Invalid`,
//! which never matches and only disables the rule that owns it.

use greyline_core::types::value::display_string;
use greyline_core::{ConditionDefinition, Operator, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators handled by `Condition::Comparison`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Eq => Some(CompareOp::Eq),
            Operator::Neq => Some(CompareOp::Neq),
            Operator::Gt => Some(CompareOp::Gt),
            Operator::Gte => Some(CompareOp::Gte),
            Operator::Lt => Some(CompareOp::Lt),
            Operator::Lte => Some(CompareOp::Lte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }
}

/// A compiled condition
#[derive(Debug, Clone)]
pub enum Condition {
    /// Equality or numeric ordering against a literal operand
    Comparison {
        field: String,
        op: CompareOp,
        operand: Value,
    },
    /// Set membership (`in`) or exclusion (`nin`)
    Membership {
        field: String,
        negated: bool,
        set: Vec<Value>,
    },
    /// Field presence (`expected == true`) or absence
    Presence { field: String, expected: bool },
    /// Regular expression over the string form of the field
    Pattern { field: String, regex: Regex },
    /// Could not be compiled; never matches
    Invalid {
        field: String,
        operator: String,
        reason: String,
    },
}

impl Condition {
    /// Compile a condition definition. Never fails: problems yield `Invalid`.
    pub fn compile(definition: &ConditionDefinition) -> Self {
        let field = definition.field.clone();
        let invalid = |reason: String| Condition::Invalid {
            field: definition.field.clone(),
            operator: definition.operator.clone(),
            reason,
        };

        let op: Operator = match definition.operator.parse() {
            Ok(op) => op,
            Err(_) => return invalid(format!("unknown operator '{}'", definition.operator)),
        };

        if let Some(compare) = CompareOp::from_operator(op) {
            return Condition::Comparison {
                field,
                op: compare,
                operand: definition.value.clone(),
            };
        }

        match op {
            Operator::In | Operator::Nin => match &definition.value {
                Value::Array(items) => Condition::Membership {
                    field,
                    negated: op == Operator::Nin,
                    set: items.clone(),
                },
                other => invalid(format!(
                    "operand for '{}' must be an array, got {}",
                    op,
                    display_string(other)
                )),
            },
            Operator::Exists => match &definition.value {
                Value::Null => Condition::Presence {
                    field,
                    expected: true,
                },
                Value::Bool(expected) => Condition::Presence {
                    field,
                    expected: *expected,
                },
                other => invalid(format!(
                    "operand for 'exists' must be a boolean, got {}",
                    display_string(other)
                )),
            },
            Operator::Regex => match &definition.value {
                Value::String(pattern) => match Regex::new(pattern) {
                    Ok(regex) => Condition::Pattern { field, regex },
                    Err(e) => invalid(format!("invalid pattern '{}': {}", pattern, e)),
                },
                other => invalid(format!(
                    "operand for 'regex' must be a string, got {}",
                    display_string(other)
                )),
            },
            _ => invalid(format!("operator '{}' is not supported", op)),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Condition::Comparison { field, .. }
            | Condition::Membership { field, .. }
            | Condition::Presence { field, .. }
            | Condition::Pattern { field, .. }
            | Condition::Invalid { field, .. } => field,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Condition::Invalid { .. })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Comparison { field, op, operand } => {
                write!(f, "{} {} {}", field, op.as_str(), operand)
            }
            Condition::Membership {
                field,
                negated,
                set,
            } => {
                let op = if *negated { "nin" } else { "in" };
                write!(f, "{} {} {}", field, op, Value::Array(set.clone()))
            }
            Condition::Presence { field, expected } => {
                write!(f, "{} exists {}", field, expected)
            }
            Condition::Pattern { field, regex } => write!(f, "{} regex /{}/", field, regex),
            Condition::Invalid {
                field, operator, ..
            } => write!(f, "{} {} <invalid>", field, operator),
        }
    }
}

/// A condition that was compiled to `Invalid`, reported on reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionWarning {
    pub rule_id: String,
    pub field: String,
    pub operator: String,
    pub reason: String,
}
