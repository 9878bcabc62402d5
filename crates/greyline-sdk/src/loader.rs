//! Rule source loading
//!
//! A rule source is either a bare list of rule definitions or a document
//! with a top-level `rules` key, written in YAML or JSON.

use crate::error::{Result, SdkError};
use greyline_core::RuleDefinition;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleDocument {
    List(Vec<RuleDefinition>),
    Wrapped { rules: Vec<RuleDefinition> },
}

impl RuleDocument {
    fn into_rules(self) -> Vec<RuleDefinition> {
        match self {
            RuleDocument::List(rules) | RuleDocument::Wrapped { rules } => rules,
        }
    }
}

/// Parse rule definitions from YAML or JSON text
pub fn parse_rules(content: &str) -> Result<Vec<RuleDefinition>> {
    let trimmed = content.trim_start();
    let document: RuleDocument = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };
    Ok(document.into_rules())
}

/// Read and parse a rule file
pub fn load_rules_from_file(path: impl AsRef<Path>) -> Result<Vec<RuleDefinition>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let rules = parse_rules(&content)
        .map_err(|e| SdkError::InvalidRuleFile(format!("{}: {}", path.display(), e)))?;

    tracing::debug!("Read {} rule definitions from {:?}", rules.len(), path);
    Ok(rules)
}
