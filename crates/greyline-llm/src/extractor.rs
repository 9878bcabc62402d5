//! Advisory reply extraction
//!
//! Turns raw provider text into an `AdvisoryAnalysis`. A reply that does not
//! decode as one JSON object degrades to a fixed low-confidence REVIEW; it is
//! never an error, so it does not cause a provider fallback.

use greyline_core::types::value::display_string;
use greyline_core::{AdvisoryAnalysis, Recommendation, Value};
use serde_json::Map;

const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Parse a provider reply into an analysis (provider and threshold unset)
pub fn parse_advisory_reply(raw: &str) -> AdvisoryAnalysis {
    let object = match extract_json_object(raw) {
        Some(object) => object,
        None => {
            tracing::warn!("Advisory reply is not a JSON object, using fallback analysis");
            return AdvisoryAnalysis::invalid_response();
        }
    };

    let recommendation = match object.get("recommendation").and_then(Value::as_str) {
        Some(label) => Recommendation::parse_label(label).unwrap_or_else(|| {
            tracing::debug!("Unknown recommendation '{}', defaulting to REVIEW", label);
            Recommendation::Review
        }),
        None => Recommendation::Review,
    };

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE);

    let reasoning = object
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default();

    AdvisoryAnalysis::new(recommendation, confidence, reasoning).with_factors(
        string_list(&object, &["risk_factors", "riskFactors"]),
        string_list(&object, &["mitigating_factors", "mitigatingFactors"]),
    )
}

/// Strip code fences and decode the remainder as a JSON object
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    let text = strip_code_fence(raw.trim());
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Content of the first ```...``` block, or the whole text when unfenced
fn strip_code_fence(content: &str) -> &str {
    let Some(start) = content.find("```") else {
        return content;
    };
    let after_start = &content[start + 3..];

    // Skip a language tag such as ```json
    let body = match after_start.find('\n') {
        Some(newline)
            if after_start[..newline]
                .trim()
                .chars()
                .all(|c| c.is_ascii_alphanumeric()) =>
        {
            &after_start[newline + 1..]
        }
        // Tag glued to the object, e.g. ```json{...}```
        _ => {
            let rest = after_start.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            if rest.trim_start().starts_with('{') {
                rest
            } else {
                after_start
            }
        }
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn string_list(object: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .map(|item| display_string(item).into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let analysis = parse_advisory_reply(
            r#"{"recommendation":"ALLOW","confidence":0.92,"reasoning":"Known device",
                "risk_factors":["new account"],"mitigating_factors":["verified email"]}"#,
        );

        assert!(analysis.valid_response);
        assert_eq!(analysis.recommendation, Recommendation::Allow);
        assert_eq!(analysis.confidence, 0.92);
        assert_eq!(analysis.reasoning, "Known device");
        assert_eq!(analysis.risk_factors, vec!["new account"]);
        assert_eq!(analysis.mitigating_factors, vec!["verified email"]);
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let analysis = parse_advisory_reply(
            "```json\n{\"recommendation\":\"deny\",\"confidence\":0.8}\n```",
        );
        assert!(analysis.valid_response);
        assert_eq!(analysis.recommendation, Recommendation::Deny);

        let bare = parse_advisory_reply("```\n{\"recommendation\":\"ALLOW\"}\n```");
        assert_eq!(bare.recommendation, Recommendation::Allow);
    }

    #[test]
    fn test_single_line_fence_with_tag() {
        let analysis =
            parse_advisory_reply(r#"```json{"recommendation":"ALLOW","confidence":0.9}```"#);
        assert!(analysis.valid_response);
        assert_eq!(analysis.recommendation, Recommendation::Allow);
        assert_eq!(analysis.confidence, 0.9);

        let spaced = parse_advisory_reply(r#"```json {"recommendation":"DENY"}```"#);
        assert!(spaced.valid_response);
        assert_eq!(spaced.recommendation, Recommendation::Deny);

        let untagged = parse_advisory_reply(r#"```{"recommendation":"ALLOW"}```"#);
        assert_eq!(untagged.recommendation, Recommendation::Allow);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let analysis = parse_advisory_reply("{}");
        assert!(analysis.valid_response);
        assert_eq!(analysis.recommendation, Recommendation::Review);
        assert_eq!(analysis.confidence, 0.5);
        assert!(analysis.risk_factors.is_empty());
        assert!(analysis.mitigating_factors.is_empty());
    }

    #[test]
    fn test_invalid_recommendation_defaults_to_review() {
        let analysis = parse_advisory_reply(r#"{"recommendation":"APPROVE","confidence":0.9}"#);
        assert_eq!(analysis.recommendation, Recommendation::Review);
    }

    #[test]
    fn test_non_numeric_confidence_defaults() {
        let analysis = parse_advisory_reply(r#"{"recommendation":"ALLOW","confidence":"high"}"#);
        assert_eq!(analysis.confidence, 0.5);
    }

    #[test]
    fn test_confidence_is_clamped() {
        for (raw, expected) in [("7.5", 1.0), ("-3", 0.0), ("1e308", 1.0), ("0.0", 0.0)] {
            let analysis = parse_advisory_reply(&format!(
                r#"{{"recommendation":"ALLOW","confidence":{}}}"#,
                raw
            ));
            assert_eq!(analysis.confidence, expected, "confidence {}", raw);
            assert!((0.0..=1.0).contains(&analysis.confidence));
        }
    }

    #[test]
    fn test_camel_case_factor_keys() {
        let analysis = parse_advisory_reply(r#"{"riskFactors":["a","b"],"mitigatingFactors":[1]}"#);
        assert_eq!(analysis.risk_factors, vec!["a", "b"]);
        assert_eq!(analysis.mitigating_factors, vec!["1"]);
    }

    #[test]
    fn test_not_json_is_invalid_response() {
        let analysis = parse_advisory_reply("not json");
        assert!(!analysis.valid_response);
        assert_eq!(analysis.recommendation, Recommendation::Review);
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.reasoning, "Invalid AI response");
    }

    #[test]
    fn test_json_array_is_invalid_response() {
        assert!(!parse_advisory_reply("[1, 2]").valid_response);
    }
}
