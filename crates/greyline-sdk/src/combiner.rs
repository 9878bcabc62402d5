//! Decision combination
//!
//! Merges a rule outcome and an advisory insight into the final decision.
//!
//! | outcome    | insight                                          | final          | source            |
//! |------------|--------------------------------------------------|----------------|-------------------|
//! | SAFE_DENY  | anything                                         | DENY           | RULE_ABSOLUTE     |
//! | SAFE_ALLOW | not analyzed, not DENY, or below threshold       | ALLOW          | RULE              |
//! | SAFE_ALLOW | DENY at or above threshold                       | REVIEW         | AI_FLAGGED_REVIEW |
//! | GREY_ZONE  | not analyzed                                     | REVIEW         | AI_UNAVAILABLE    |
//! | GREY_ZONE  | analyzed, meets threshold                        | recommendation | AI_RECOMMENDED    |
//! | GREY_ZONE  | analyzed, below threshold                        | REVIEW         | AI_UNCERTAIN      |

use greyline_core::{
    AiInsight, DecisionSource, FinalDecision, FinalVerdict, Recommendation, RuleEvaluationResult,
    RuleOutcome,
};

const DEFAULT_RULE_CONFIDENCE: f64 = 1.0;

/// Stateless combiner
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisionCombiner;

impl DecisionCombiner {
    /// Combine a rule result with an insight. Total over every input pair.
    pub fn combine(rule_result: &RuleEvaluationResult, insight: &AiInsight) -> FinalDecision {
        let rule_confidence = rule_result
            .matched_rule
            .as_ref()
            .and_then(|rule| rule.confidence)
            .unwrap_or(DEFAULT_RULE_CONFIDENCE);

        match rule_result.outcome {
            // Deterministic deny is final; the insight is not consulted
            RuleOutcome::SafeDeny => FinalDecision::new(
                FinalVerdict::Deny,
                DecisionSource::RuleAbsolute,
                Some(rule_confidence),
            ),

            RuleOutcome::SafeAllow => match insight.analysis() {
                Some(analysis)
                    if analysis.recommendation == Recommendation::Deny
                        && analysis.meets_confidence_threshold =>
                {
                    FinalDecision::new(
                        FinalVerdict::Review,
                        DecisionSource::AiFlaggedReview,
                        Some(analysis.confidence),
                    )
                }
                _ => FinalDecision::new(
                    FinalVerdict::Allow,
                    DecisionSource::Rule,
                    Some(rule_confidence),
                ),
            },

            RuleOutcome::GreyZone => match insight.analysis() {
                None => FinalDecision::new(FinalVerdict::Review, DecisionSource::AiUnavailable, None),
                Some(analysis) if analysis.meets_confidence_threshold => FinalDecision::new(
                    analysis.recommendation.into(),
                    DecisionSource::AiRecommended,
                    Some(analysis.confidence),
                ),
                Some(analysis) => FinalDecision::new(
                    FinalVerdict::Review,
                    DecisionSource::AiUncertain,
                    Some(analysis.confidence),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greyline_core::{
        AdvisoryAnalysis, EvaluationStep, MatchedRule, NotAnalyzedReason, Verdict,
    };

    const THRESHOLD: f64 = 0.7;

    fn matched(verdict: Verdict, confidence: Option<f64>) -> RuleEvaluationResult {
        RuleEvaluationResult::matched(
            MatchedRule {
                id: "R1".to_string(),
                name: "rule".to_string(),
                priority: 1,
                outcome: verdict,
                confidence,
            },
            vec![EvaluationStep::new("R1", true, "all 1 conditions matched")],
        )
    }

    fn grey() -> RuleEvaluationResult {
        RuleEvaluationResult::grey_zone(vec![EvaluationStep::new("R1", false, "no")])
    }

    fn analyzed(recommendation: Recommendation, confidence: f64) -> AiInsight {
        AiInsight::Analyzed(
            AdvisoryAnalysis::new(recommendation, confidence, "r").with_threshold(THRESHOLD),
        )
    }

    /// Every insight shape the combiner can see
    fn all_insights() -> Vec<AiInsight> {
        let mut insights = vec![
            AiInsight::not_analyzed(NotAnalyzedReason::AiDisabled),
            AiInsight::not_analyzed(NotAnalyzedReason::NotGreyZone),
            AiInsight::all_providers_failed(12.0, Vec::new()),
            AiInsight::Analyzed(AdvisoryAnalysis::invalid_response().with_threshold(THRESHOLD)),
        ];
        for recommendation in [Recommendation::Allow, Recommendation::Deny, Recommendation::Review] {
            for confidence in [0.0, 0.1, 0.4, 0.69, 0.7, 0.85, 0.92, 1.0] {
                insights.push(analyzed(recommendation, confidence));
            }
        }
        insights
    }

    #[test]
    fn test_safe_deny_is_never_overridden() {
        let rule_result = matched(Verdict::SafeDeny, None);
        for insight in all_insights() {
            let decision = DecisionCombiner::combine(&rule_result, &insight);
            assert_eq!(decision.verdict, FinalVerdict::Deny, "insight {:?}", insight);
            assert_eq!(decision.source, DecisionSource::RuleAbsolute);
            assert_eq!(decision.confidence, Some(1.0));
        }
    }

    #[test]
    fn test_safe_deny_carries_rule_confidence() {
        let decision = DecisionCombiner::combine(
            &matched(Verdict::SafeDeny, Some(0.99)),
            &analyzed(Recommendation::Allow, 1.0),
        );
        assert_eq!(decision.confidence, Some(0.99));
    }

    #[test]
    fn test_safe_allow_kept() {
        let rule_result = matched(Verdict::SafeAllow, None);
        for insight in [
            AiInsight::not_analyzed(NotAnalyzedReason::NotGreyZone),
            analyzed(Recommendation::Allow, 0.99),
            analyzed(Recommendation::Review, 0.99),
            analyzed(Recommendation::Deny, 0.69),
        ] {
            let decision = DecisionCombiner::combine(&rule_result, &insight);
            assert_eq!(decision.verdict, FinalVerdict::Allow);
            assert_eq!(decision.source, DecisionSource::Rule);
        }
    }

    #[test]
    fn test_safe_allow_flagged_by_confident_deny() {
        let decision = DecisionCombiner::combine(
            &matched(Verdict::SafeAllow, None),
            &analyzed(Recommendation::Deny, 0.85),
        );
        assert_eq!(decision.verdict, FinalVerdict::Review);
        assert_eq!(decision.source, DecisionSource::AiFlaggedReview);
        assert_eq!(decision.confidence, Some(0.85));
    }

    #[test]
    fn test_grey_zone_without_analysis() {
        for insight in [
            AiInsight::not_analyzed(NotAnalyzedReason::AiDisabled),
            AiInsight::all_providers_failed(30.0, Vec::new()),
        ] {
            let decision = DecisionCombiner::combine(&grey(), &insight);
            assert_eq!(decision.verdict, FinalVerdict::Review);
            assert_eq!(decision.source, DecisionSource::AiUnavailable);
            assert_eq!(decision.confidence, None);
        }
    }

    #[test]
    fn test_grey_zone_confident_recommendation() {
        let decision = DecisionCombiner::combine(&grey(), &analyzed(Recommendation::Allow, 0.92));
        assert_eq!(decision.verdict, FinalVerdict::Allow);
        assert_eq!(decision.source, DecisionSource::AiRecommended);
        assert_eq!(decision.confidence, Some(0.92));

        let deny = DecisionCombiner::combine(&grey(), &analyzed(Recommendation::Deny, 0.7));
        assert_eq!(deny.verdict, FinalVerdict::Deny);
    }

    #[test]
    fn test_grey_zone_uncertain_recommendation() {
        let decision = DecisionCombiner::combine(&grey(), &analyzed(Recommendation::Allow, 0.4));
        assert_eq!(decision.verdict, FinalVerdict::Review);
        assert_eq!(decision.source, DecisionSource::AiUncertain);
        assert_eq!(decision.confidence, Some(0.4));
    }

    #[test]
    fn test_invalid_reply_is_uncertain() {
        let insight =
            AiInsight::Analyzed(AdvisoryAnalysis::invalid_response().with_threshold(THRESHOLD));
        let decision = DecisionCombiner::combine(&grey(), &insight);
        assert_eq!(decision.verdict, FinalVerdict::Review);
        assert_eq!(decision.source, DecisionSource::AiUncertain);
        assert_eq!(decision.confidence, Some(0.0));
    }

    #[test]
    fn test_combiner_is_total() {
        let results = [
            matched(Verdict::SafeAllow, None),
            matched(Verdict::SafeDeny, Some(0.5)),
            grey(),
        ];
        for rule_result in &results {
            for insight in all_insights() {
                let decision = DecisionCombiner::combine(rule_result, &insight);
                assert_ne!(decision.verdict, FinalVerdict::Error);
                assert_ne!(decision.source, DecisionSource::SystemError);
                if let Some(confidence) = decision.confidence {
                    assert!((0.0..=1.0).contains(&confidence));
                }
            }
        }
    }
}
