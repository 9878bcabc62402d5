//! Subcommand implementations

use anyhow::{Context, Result};
use greyline_sdk::{DecisionEngine, DecisionEngineBuilder, DecisionInput, EngineConfig};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Exit code for a `SYSTEM_ERROR` envelope
const EXIT_SYSTEM_ERROR: u8 = 2;

pub async fn decide(
    config: EngineConfig,
    input: Option<&Path>,
    request_id: Option<String>,
    pretty: bool,
) -> Result<ExitCode> {
    let input = read_input(input)?;
    let engine = DecisionEngine::new(config).context("Failed to build decision engine")?;

    let envelope = engine.decide(input, request_id).await;
    info!(
        request_id = %envelope.request_id(),
        "Decision: {:?}",
        envelope.verdict()
    );
    print_json(&envelope, pretty)?;

    if envelope.is_error() {
        Ok(ExitCode::from(EXIT_SYSTEM_ERROR))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

pub fn validate(file: &Path) -> Result<ExitCode> {
    let summary = validate_rules(file)?;
    print_json(&summary, true)?;
    Ok(ExitCode::SUCCESS)
}

pub fn status(config: EngineConfig) -> Result<ExitCode> {
    let engine = DecisionEngine::new(config).context("Failed to build decision engine")?;
    let status = engine.status()?;
    print_json(&status, true)?;
    Ok(ExitCode::SUCCESS)
}

/// Result of `validate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub file: String,
    pub rule_count: usize,
    pub warnings: Vec<greyline_sdk::ConditionWarning>,
}

/// Compile a rule file without enabling the advisor
pub fn validate_rules(file: &Path) -> Result<ValidationSummary> {
    let engine = DecisionEngineBuilder::new()
        .with_rule_file(file)
        .enable_metrics(false)
        .build()
        .with_context(|| format!("Invalid rule file {}", file.display()))?;
    let rules = engine.rule_engine().snapshot()?;

    Ok(ValidationSummary {
        file: file.display().to_string(),
        rule_count: rules.len(),
        warnings: rules.warnings().to_vec(),
    })
}

/// Read a decision input from a file, or stdin for `None` / `-`
pub fn read_input(path: Option<&Path>) -> Result<DecisionInput> {
    let content = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            buffer
        }
    };

    parse_input(&content)
}

pub fn parse_input(content: &str) -> Result<DecisionInput> {
    serde_json::from_str(content).context("Input must be a JSON object with `request` and `signals`")
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
