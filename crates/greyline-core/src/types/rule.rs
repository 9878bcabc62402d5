//! Declarative rule definitions
//!
//! This is the format accepted from the rule configuration source. Definitions
//! are validated structurally here; operator and pattern problems are left to
//! the rule compiler, which degrades them to non-matching conditions.

use crate::error::{CoreError, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Deterministic verdict a rule can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    SafeAllow,
    SafeDeny,
}

/// Condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Strict equality
    Eq,
    /// Strict inequality
    Neq,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Member of an array operand
    In,
    /// Not a member of an array operand
    Nin,
    /// Field presence
    Exists,
    /// Regular expression match
    Regex,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Exists => "exists",
            Operator::Regex => "regex",
        }
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eq" => Ok(Operator::Eq),
            "neq" => Ok(Operator::Neq),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "in" => Ok(Operator::In),
            "nin" => Ok(Operator::Nin),
            "exists" => Ok(Operator::Exists),
            "regex" => Ok(Operator::Regex),
            other => Err(CoreError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single condition as written in the rule source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDefinition {
    /// Dot-separated path into the `{request, signals}` payload
    pub field: String,

    /// Operator name, kept as text so an unknown operator only disables its rule
    pub operator: String,

    /// Operand (array for `in`/`nin`, pattern for `regex`, bool for `exists`)
    #[serde(default)]
    pub value: Value,
}

impl ConditionDefinition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: operator.as_str().to_string(),
            value,
        }
    }
}

/// Rule definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Unique rule ID
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Evaluation order, lowest first
    pub priority: i64,

    /// Conditions, all of which must hold
    pub conditions: Vec<ConditionDefinition>,

    /// Verdict produced when the rule matches
    pub outcome: Verdict,

    /// Confidence reported on decisions sourced from this rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RuleDefinition {
    /// Create a new rule
    pub fn new(id: impl Into<String>, name: impl Into<String>, priority: i64, outcome: Verdict) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            priority,
            conditions: Vec::new(),
            outcome,
            confidence: None,
        }
    }

    /// Add a condition
    pub fn with_condition(mut self, condition: ConditionDefinition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the rule confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Structural validation of a single rule
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::invalid_rule(&self.id, "id must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_rule(&self.id, "name must not be empty"));
        }
        if self.conditions.is_empty() {
            return Err(CoreError::invalid_rule(
                &self.id,
                "at least one condition is required",
            ));
        }
        if let Some(index) = self.conditions.iter().position(|c| c.field.trim().is_empty()) {
            return Err(CoreError::invalid_rule(
                &self.id,
                format!("condition {} has an empty field path", index),
            ));
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(CoreError::invalid_rule(
                    &self.id,
                    format!("confidence {} outside [0, 1]", confidence),
                ));
            }
        }
        Ok(())
    }
}

/// Validate a complete rule set: every rule individually, plus unique ids.
pub fn validate_rule_set(rules: &[RuleDefinition]) -> Result<()> {
    let mut seen = HashSet::with_capacity(rules.len());
    for rule in rules {
        rule.validate()?;
        if !seen.insert(rule.id.as_str()) {
            return Err(CoreError::DuplicateRuleId(rule.id.clone()));
        }
    }
    Ok(())
}
