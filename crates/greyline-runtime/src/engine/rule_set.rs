//! Compiled, immutable rule sets

use super::condition::{Condition, ConditionWarning};
use super::operators::{check_condition, ConditionCheck};
use crate::error::Result;
use chrono::{DateTime, Utc};
use greyline_core::types::validate_rule_set;
use greyline_core::{
    EvaluationStep, MatchedRule, RuleDefinition, RuleEvaluationResult, Value, Verdict,
};
use std::time::Instant;

/// A rule with its conditions compiled
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: String,
    pub name: String,
    pub priority: i64,
    pub outcome: Verdict,
    pub confidence: Option<f64>,
    pub conditions: Vec<Condition>,
}

impl CompiledRule {
    fn compile(definition: &RuleDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            priority: definition.priority,
            outcome: definition.outcome,
            confidence: definition.confidence,
            conditions: definition.conditions.iter().map(Condition::compile).collect(),
        }
    }

    /// Check every condition (AND), stopping at the first one that does not hold.
    /// Returns the matched flag and a short reason for the evaluation path.
    fn check(&self, input: &Value) -> (bool, String) {
        for condition in &self.conditions {
            match check_condition(condition, input) {
                ConditionCheck::Pass => continue,
                ConditionCheck::Fail(reason) => return (false, reason),
                ConditionCheck::Malformed(reason) => {
                    tracing::debug!(rule_id = %self.id, "Skipping rule with malformed condition: {}", reason);
                    return (false, format!("malformed condition: {}", reason));
                }
            }
        }
        (true, format!("all {} conditions matched", self.conditions.len()))
    }

    fn summary(&self) -> MatchedRule {
        MatchedRule {
            id: self.id.clone(),
            name: self.name.clone(),
            priority: self.priority,
            outcome: self.outcome,
            confidence: self.confidence,
        }
    }
}

/// Immutable rule snapshot, ordered by priority
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    version: u64,
    loaded_at: DateTime<Utc>,
    warnings: Vec<ConditionWarning>,
}

impl RuleSet {
    /// Validate and compile a rule set.
    ///
    /// Structural problems reject the whole set. Conditions that cannot be
    /// compiled are kept as non-matching and reported as warnings.
    pub fn compile(definitions: &[RuleDefinition]) -> Result<Self> {
        validate_rule_set(definitions)?;

        let mut rules: Vec<CompiledRule> = definitions.iter().map(CompiledRule::compile).collect();
        // Stable: equal priorities keep their source order
        rules.sort_by_key(|rule| rule.priority);

        let mut warnings = Vec::new();
        for rule in &rules {
            for condition in &rule.conditions {
                if let Condition::Invalid {
                    field,
                    operator,
                    reason,
                } = condition
                {
                    tracing::warn!(
                        rule_id = %rule.id,
                        field = %field,
                        "Malformed condition, rule will never match: {}",
                        reason
                    );
                    warnings.push(ConditionWarning {
                        rule_id: rule.id.clone(),
                        field: field.clone(),
                        operator: operator.clone(),
                        reason: reason.clone(),
                    });
                }
            }
        }

        Ok(Self {
            rules,
            version: 0,
            loaded_at: Utc::now(),
            warnings,
        })
    }

    /// Empty rule set: every request is grey-zone
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            version: 0,
            loaded_at: Utc::now(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Evaluate rules in priority order; the first match wins.
    pub fn evaluate(&self, input: &Value) -> RuleEvaluationResult {
        let start = Instant::now();
        let mut path = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (matched, reason) = rule.check(input);
            path.push(EvaluationStep::new(&rule.id, matched, reason));
            if matched {
                tracing::debug!(rule_id = %rule.id, outcome = ?rule.outcome, "Rule matched");
                return RuleEvaluationResult::matched(rule.summary(), path)
                    .with_time_ms(elapsed_ms(start));
            }
        }

        RuleEvaluationResult::grey_zone(path).with_time_ms(elapsed_ms(start))
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn warnings(&self) -> &[ConditionWarning] {
        &self.warnings
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
