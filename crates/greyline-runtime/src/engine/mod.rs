//! Rule evaluation engine
//!
//! `RuleEngine` owns the active rule snapshot. Evaluation clones the current
//! `Arc<RuleSet>` and works on it alone, so a concurrent reload never changes
//! the rules an in-flight evaluation sees.

mod condition;
mod operators;
mod rule_set;

#[cfg(test)]
mod tests;

pub use condition::{CompareOp, Condition, ConditionWarning};
pub use rule_set::{CompiledRule, RuleSet};

use crate::error::Result;
use crate::snapshot::Snapshot;
use greyline_core::{RuleDefinition, RuleEvaluationResult, Value};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Outcome of a successful reload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadReport {
    pub previous_version: u64,
    pub version: u64,
    pub rule_count: usize,
    pub warnings: Vec<ConditionWarning>,
}

pub struct RuleEngine {
    current: Snapshot<RuleSet>,
    next_version: AtomicU64,
    reload_lock: Mutex<()>,
}

impl RuleEngine {
    /// Create an engine from rule definitions (version 1)
    pub fn new(definitions: &[RuleDefinition]) -> Result<Self> {
        let rules = RuleSet::compile(definitions)?.with_version(1);
        tracing::info!("Loaded {} rules", rules.len());
        Ok(Self {
            current: Snapshot::new(rules),
            next_version: AtomicU64::new(2),
            reload_lock: Mutex::new(()),
        })
    }

    /// Engine with no rules (version 0)
    pub fn empty() -> Self {
        Self {
            current: Snapshot::new(RuleSet::empty()),
            next_version: AtomicU64::new(1),
            reload_lock: Mutex::new(()),
        }
    }

    /// Evaluate the current snapshot against a `{request, signals}` payload
    pub fn evaluate(&self, input: &Value) -> Result<RuleEvaluationResult> {
        let rules = self.current.load()?;
        Ok(rules.evaluate(input))
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Result<Arc<RuleSet>> {
        self.current.load()
    }

    /// Validate and install a full replacement rule set.
    ///
    /// On error the previous snapshot stays active.
    pub fn reload(&self, definitions: &[RuleDefinition]) -> Result<ReloadReport> {
        let compiled = match RuleSet::compile(definitions) {
            Ok(compiled) => compiled,
            Err(e) => {
                tracing::warn!("Rejected rule reload, keeping previous rules: {}", e);
                return Err(e);
            }
        };

        // Serialise publishers so versions are installed in order
        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let compiled = compiled.with_version(version);
        let rule_count = compiled.len();
        let warnings = compiled.warnings().to_vec();

        let previous = self.current.store(Arc::new(compiled))?;
        tracing::info!(
            "✓ Rule set reloaded: version {} -> {}, {} rules",
            previous.version(),
            version,
            rule_count
        );

        Ok(ReloadReport {
            previous_version: previous.version(),
            version,
            rule_count,
            warnings,
        })
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("RuleEngine");
        if let Ok(rules) = self.current.load() {
            s.field("version", &rules.version())
                .field("num_rules", &rules.len());
        }
        s.finish()
    }
}
