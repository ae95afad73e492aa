//! Lexicon-based polarity scoring.
//!
//! Tokens are compared by exact lowercase equality after whitespace
//! splitting. There is no stemming and punctuation is not stripped, so
//! "love," does not count as "love".

use std::collections::HashSet;

use super::{SentimentLabel, SentimentScore};
use crate::config::SentimentConfig;

pub const DEFAULT_POSITIVE_WORDS: &[&str] = &[
    "love", "happy", "joy", "good", "great", "wonderful", "beautiful", "hope", "smile",
    "laugh", "win", "peace", "friend", "kind", "safe", "proud", "حب", "سعيد", "فرح",
    "جميل", "أمل", "سلام", "ضحك", "نجاح", "صديق", "رائع", "أحبك", "سعادة",
];

pub const DEFAULT_NEGATIVE_WORDS: &[&str] = &[
    "hate", "sad", "angry", "fear", "death", "dead", "kill", "pain", "cry", "bad",
    "terrible", "war", "lose", "enemy", "blood", "alone", "كره", "حزين", "غضب", "خوف",
    "موت", "قتل", "ألم", "بكاء", "حرب", "دم", "عدو", "وحيد",
];

/// Pure lexicon scorer over raw text.
#[derive(Debug, Clone)]
pub struct RuleSentimentScorer {
    positive: HashSet<String>,
    negative: HashSet<String>,
    positive_threshold: f64,
    negative_threshold: f64,
}

impl Default for RuleSentimentScorer {
    fn default() -> Self {
        Self::new(&SentimentConfig::default())
    }
}

impl RuleSentimentScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self::with_lexicons(
            &config.positive_words,
            &config.negative_words,
            config.positive_threshold,
            config.negative_threshold,
        )
    }

    pub fn with_lexicons(
        positive: &[String],
        negative: &[String],
        positive_threshold: f64,
        negative_threshold: f64,
    ) -> Self {
        let lower = |words: &[String]| words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            positive: lower(positive),
            negative: lower(negative),
            positive_threshold,
            negative_threshold,
        }
    }

    /// Hit counts against the positive and negative lexicons.
    pub fn count_hits(&self, text: &str) -> (usize, usize) {
        let lowered = text.to_lowercase();
        lowered
            .split_whitespace()
            .fold((0, 0), |(pos, neg), token| {
                (
                    pos + usize::from(self.positive.contains(token)),
                    neg + usize::from(self.negative.contains(token)),
                )
            })
    }

    /// Score is the positive share of all lexicon hits; 0.5 (neutral) with no hits.
    pub fn score(&self, text: &str) -> SentimentScore {
        let (positive, negative) = self.count_hits(text);
        let total = positive + negative;

        if total == 0 {
            return SentimentScore::new(SentimentLabel::Neutral, 0.5);
        }

        let score = positive as f64 / total as f64;
        SentimentScore::new(self.label_for(score), score)
    }

    fn label_for(&self, score: f64) -> SentimentLabel {
        if score > self.positive_threshold {
            SentimentLabel::Positive
        } else if score < self.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_positive_hit() {
        let scored = RuleSentimentScorer::default().score("i love this game");
        assert_eq!(scored.label, SentimentLabel::Positive);
        assert_eq!(scored.score, 1.0);
    }

    #[test]
    fn test_no_hits_is_neutral() {
        let scored = RuleSentimentScorer::default().score("no sentiment words here");
        assert_eq!(scored, SentimentScore::new(SentimentLabel::Neutral, 0.5));
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let scored = RuleSentimentScorer::default().score("");
        assert_eq!(scored, SentimentScore::new(SentimentLabel::Neutral, 0.5));
    }

    #[test]
    fn test_case_insensitive() {
        let scored = RuleSentimentScorer::default().score("LOVE and HATE and Fear");
        assert_eq!(RuleSentimentScorer::default().count_hits("LOVE and HATE and Fear"), (1, 2));
        assert_eq!(scored.label, SentimentLabel::Negative);
        assert!((scored.score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_trailing_punctuation_does_not_match() {
        let scored = RuleSentimentScorer::default().score("I love, you hate.");
        assert_eq!(scored, SentimentScore::new(SentimentLabel::Neutral, 0.5));
    }

    #[test]
    fn test_balanced_is_neutral() {
        let scored = RuleSentimentScorer::default().score("love hate");
        assert_eq!(scored, SentimentScore::new(SentimentLabel::Neutral, 0.5));
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let scorer = RuleSentimentScorer::with_lexicons(&words(&["up"]), &words(&["down"]), 0.6, 0.4);
        // 3 of 5 = 0.6 exactly: not above the positive threshold
        assert_eq!(scorer.score("up up up down down").label, SentimentLabel::Neutral);
        // 2 of 5 = 0.4 exactly: not below the negative threshold
        assert_eq!(scorer.score("up up down down down").label, SentimentLabel::Neutral);
        assert_eq!(scorer.score("up up up up down").label, SentimentLabel::Positive);
        assert_eq!(scorer.score("up down down down down").label, SentimentLabel::Negative);
    }

    #[test]
    fn test_repeated_words_count_each_time() {
        let scorer = RuleSentimentScorer::with_lexicons(&words(&["good"]), &words(&["bad"]), 0.6, 0.4);
        assert_eq!(scorer.count_hits("good good bad"), (2, 1));
    }

    #[test]
    fn test_arabic_lexicon() {
        let scored = RuleSentimentScorer::default().score("كان يوم حزين و موت");
        assert_eq!(scored.label, SentimentLabel::Negative);
        assert_eq!(scored.score, 0.0);
    }

    #[test]
    fn test_custom_lexicon_lowercased() {
        let scorer = RuleSentimentScorer::with_lexicons(&words(&["Bravo"]), &[], 0.6, 0.4);
        assert_eq!(scorer.score("bravo").label, SentimentLabel::Positive);
    }
}
