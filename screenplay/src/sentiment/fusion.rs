//! Combination of the lexicon verdict with the classifier verdict.

use log::warn;
use sentiment_oracle::Classification;

use super::{HybridResult, SentimentLabel, SentimentScore};
use crate::config::SentimentConfig;

/// Map a free-form classifier label onto the closed label set.
///
/// Containment is checked case-insensitively, `pos` before `neg`, so star
/// ratings such as `"5 stars"` land on neutral.
pub fn normalize_label(raw: &str) -> SentimentLabel {
    let lowered = raw.to_lowercase();
    if lowered.contains("pos") {
        SentimentLabel::Positive
    } else if lowered.contains("neg") {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// What the classifier produced for one scene.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleOutcome {
    Classified(SentimentScore),
    /// No classifier configured, or the scene had no text to classify
    Unavailable,
    /// The call errored or timed out
    Failed(String),
}

impl OracleOutcome {
    /// Accept a classifier verdict. A score outside `[0, 1]` (NaN included)
    /// counts as a failed call.
    pub fn classified(classification: &Classification) -> Self {
        let score = classification.score;
        if !(0.0..=1.0).contains(&score) {
            warn!(
                "Classifier score {} for label {:?} is outside [0, 1]; ignoring it",
                score, classification.label
            );
            return Self::Failed(format!("score out of range: {}", score));
        }

        Self::Classified(SentimentScore::new(
            normalize_label(&classification.label),
            classification.score,
        ))
    }

    fn score(&self) -> Option<SentimentScore> {
        match self {
            Self::Classified(score) => Some(*score),
            Self::Unavailable | Self::Failed(_) => None,
        }
    }
}

/// Weights and thresholds of the fusion step.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionPolicy {
    pub trust_threshold: f64,
    pub agree_score: f64,
    pub disagree_score: f64,
    pub oracle_weight: f64,
    pub rule_weight: f64,
    pub agreement_weight: f64,
    pub divisor: f64,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self::from(&SentimentConfig::default())
    }
}

impl From<&SentimentConfig> for FusionPolicy {
    fn from(config: &SentimentConfig) -> Self {
        Self {
            trust_threshold: config.trust_threshold,
            agree_score: config.agree_score,
            disagree_score: config.disagree_score,
            oracle_weight: config.oracle_weight,
            rule_weight: config.rule_weight,
            agreement_weight: config.agreement_weight,
            divisor: config.divisor,
        }
    }
}

impl FusionPolicy {
    /// Fuse one scene's verdicts. Without a classifier verdict the rule
    /// verdict stands in for it, so the result degenerates to rule-only.
    pub fn fuse(&self, rule: &SentimentScore, oracle: &OracleOutcome) -> HybridResult {
        let ml = oracle.score().unwrap_or(*rule);

        let agreement_score = if ml.label == rule.label {
            self.agree_score
        } else {
            self.disagree_score
        };

        let overall_sentiment = if agreement_score > self.trust_threshold {
            ml.label
        } else {
            let rule_margin = (rule.score - 0.5).abs() * 2.0;
            if ml.score > rule_margin {
                ml.label
            } else {
                rule.label
            }
        };

        let raw = (ml.score * self.oracle_weight
            + rule.score * self.rule_weight
            + agreement_score * self.agreement_weight)
            / self.divisor;

        HybridResult {
            overall_sentiment,
            confidence: raw.clamp(0.0, 1.0),
            ml_sentiment: ml,
            rule_sentiment: *rule,
            agreement_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn score(label: SentimentLabel, score: f64) -> SentimentScore {
        SentimentScore::new(label, score)
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("POSITIVE"), SentimentLabel::Positive);
        assert_eq!(normalize_label("LABEL_pos"), SentimentLabel::Positive);
        assert_eq!(normalize_label("Negative"), SentimentLabel::Negative);
        assert_eq!(normalize_label("neutral"), SentimentLabel::Neutral);
        assert_eq!(normalize_label("5 stars"), SentimentLabel::Neutral);
        assert_eq!(normalize_label(""), SentimentLabel::Neutral);
        // "pos" wins when both appear
        assert_eq!(normalize_label("neg-or-pos"), SentimentLabel::Positive);
    }

    #[test]
    fn test_outcome_from_classification() {
        let outcome = OracleOutcome::classified(&Classification::new("NEGATIVE", 0.8));
        assert_eq!(
            outcome,
            OracleOutcome::Classified(score(SentimentLabel::Negative, 0.8))
        );
    }

    #[test]
    fn test_out_of_range_scores_rejected() {
        for bad in [-3.0, 7.0, 1.0001, f64::NAN, f64::INFINITY] {
            let outcome = OracleOutcome::classified(&Classification::new("negative", bad));
            assert!(
                matches!(outcome, OracleOutcome::Failed(_)),
                "score {} accepted",
                bad
            );
        }

        for ok in [0.0, 0.5, 1.0] {
            let outcome = OracleOutcome::classified(&Classification::new("negative", ok));
            assert!(matches!(outcome, OracleOutcome::Classified(_)));
        }
    }

    #[test]
    fn test_rejected_score_falls_back_to_rule() {
        let policy = FusionPolicy::default();
        let rule = score(SentimentLabel::Positive, 1.0);
        let outcome = OracleOutcome::classified(&Classification::new("negative", -3.0));

        let result = policy.fuse(&rule, &outcome);
        assert_eq!(result.ml_sentiment, rule);
        assert_eq!(result.overall_sentiment, SentimentLabel::Positive);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_confidence_floored_at_zero() {
        let policy = FusionPolicy {
            agreement_weight: -5.0,
            ..FusionPolicy::default()
        };
        let zero = score(SentimentLabel::Negative, 0.0);
        let result = policy.fuse(&zero, &OracleOutcome::Classified(zero));
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_agreeing_verdicts() {
        let policy = FusionPolicy::default();
        let result = policy.fuse(
            &score(SentimentLabel::Positive, 1.0),
            &OracleOutcome::Classified(score(SentimentLabel::Positive, 0.9)),
        );

        assert_eq!(result.overall_sentiment, SentimentLabel::Positive);
        assert_eq!(result.agreement_score, 1.0);
        let expected = (0.9 * 0.7 + 1.0 * 0.3 + 1.0 * 0.2) / 1.2;
        assert!((result.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_confident_oracle_overrides_rule() {
        let policy = FusionPolicy::default();
        // rule margin |0.7 - 0.5| * 2 = 0.4
        let result = policy.fuse(
            &score(SentimentLabel::Positive, 0.7),
            &OracleOutcome::Classified(score(SentimentLabel::Negative, 0.9)),
        );

        assert_eq!(result.agreement_score, 0.3);
        assert_eq!(result.overall_sentiment, SentimentLabel::Negative);
        let expected = (0.9 * 0.7 + 0.7 * 0.3 + 0.3 * 0.2) / 1.2;
        assert!((result.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_decisive_rule_keeps_its_label() {
        let policy = FusionPolicy::default();
        // rule margin |0.0 - 0.5| * 2 = 1.0, never strictly exceeded
        let result = policy.fuse(
            &score(SentimentLabel::Negative, 0.0),
            &OracleOutcome::Classified(score(SentimentLabel::Positive, 1.0)),
        );
        assert_eq!(result.overall_sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_tie_on_margin_goes_to_rule() {
        let policy = FusionPolicy::default();
        // margin |0.75 - 0.5| * 2 = 0.5, oracle score equal
        let result = policy.fuse(
            &score(SentimentLabel::Positive, 0.75),
            &OracleOutcome::Classified(score(SentimentLabel::Neutral, 0.5)),
        );
        assert_eq!(result.overall_sentiment, SentimentLabel::Positive);
    }

    #[test]
    fn test_neutral_rule_yields_to_oracle() {
        let policy = FusionPolicy::default();
        // no lexicon hits: margin 0, any positive oracle score wins
        let result = policy.fuse(
            &score(SentimentLabel::Neutral, 0.5),
            &OracleOutcome::Classified(score(SentimentLabel::Negative, 0.05)),
        );
        assert_eq!(result.overall_sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_missing_oracle_mirrors_rule() {
        let policy = FusionPolicy::default();
        let rule = score(SentimentLabel::Negative, 0.25);

        for outcome in [
            OracleOutcome::Unavailable,
            OracleOutcome::Failed("boom".to_string()),
        ] {
            let result = policy.fuse(&rule, &outcome);
            assert_eq!(result.ml_sentiment, rule);
            assert_eq!(result.rule_sentiment, rule);
            assert_eq!(result.agreement_score, 1.0);
            assert_eq!(result.overall_sentiment, SentimentLabel::Negative);
        }
    }

    #[test]
    fn test_full_scores_give_exactly_one() {
        let policy = FusionPolicy::default();
        let full = score(SentimentLabel::Positive, 1.0);
        let result = policy.fuse(&full, &OracleOutcome::Classified(full));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_confidence_capped_with_custom_weights() {
        let policy = FusionPolicy {
            divisor: 0.5,
            ..FusionPolicy::default()
        };
        let full = score(SentimentLabel::Positive, 1.0);
        let result = policy.fuse(&full, &OracleOutcome::Classified(full));
        assert_eq!(result.confidence, 1.0);
    }

    fn label_strategy() -> impl Strategy<Value = SentimentLabel> {
        prop_oneof![
            Just(SentimentLabel::Positive),
            Just(SentimentLabel::Negative),
            Just(SentimentLabel::Neutral),
        ]
    }

    proptest! {
        #[test]
        fn prop_confidence_bounded_and_deterministic(
            rule_label in label_strategy(),
            rule_score in 0.0f64..=1.0,
            ml_label in label_strategy(),
            ml_score in 0.0f64..=1.0,
        ) {
            let policy = FusionPolicy::default();
            let rule = score(rule_label, rule_score);
            let oracle = OracleOutcome::Classified(score(ml_label, ml_score));

            let first = policy.fuse(&rule, &oracle);
            let second = policy.fuse(&rule, &oracle);

            prop_assert!(first.confidence <= 1.0);
            prop_assert!(first.confidence >= 0.0);
            prop_assert!(first.agreement_score == 1.0 || first.agreement_score == 0.3);
            prop_assert!(
                first.overall_sentiment == rule_label || first.overall_sentiment == ml_label
            );
            prop_assert_eq!(first, second);
        }
    }
}
