//! Advisory prompt construction

use greyline_core::{RuleEvaluationResult, Value};

/// Prompt template for grey-zone risk analysis
pub const ADVISORY_PROMPT: &str = r#"You are a risk analyst reviewing a request that the deterministic rule engine could not classify.

Request and signals:
{input}

Rule evaluation trace (every rule tried, in order):
{trace}

Assess whether the request should be allowed, denied, or sent to manual review.

Respond with ONE JSON object and nothing else:
{
  "recommendation": "ALLOW" | "DENY" | "REVIEW",
  "confidence": <number between 0 and 1>,
  "reasoning": "<one or two sentences>",
  "risk_factors": ["<factor>", ...],
  "mitigating_factors": ["<factor>", ...]
}

Requirements:
1. Output valid JSON only, no markdown code blocks, no explanations
2. Use REVIEW when the evidence is inconclusive
3. Confidence reflects how certain you are of the recommendation"#;

/// Build the advisory prompt for one request
pub fn build_advisory_prompt(input: &Value, rule_result: &RuleEvaluationResult) -> String {
    let input_text =
        serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string());

    ADVISORY_PROMPT
        .replace("{input}", &input_text)
        .replace("{trace}", &format_trace(rule_result))
}

fn format_trace(rule_result: &RuleEvaluationResult) -> String {
    if rule_result.evaluation_path.is_empty() {
        return "(no rules configured)".to_string();
    }

    let mut lines: Vec<String> = rule_result
        .evaluation_path
        .iter()
        .map(|step| {
            let status = if step.matched { "matched" } else { "no match" };
            format!("- {}: {} ({})", step.rule_id, status, step.reason)
        })
        .collect();
    lines.push(format!("Outcome: {}", rule_result.outcome.as_str()));
    lines.join("\n")
}
