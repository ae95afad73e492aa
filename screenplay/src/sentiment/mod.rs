//! Hybrid scene sentiment: lexicon scoring fused with an optional classifier.

pub mod fusion;
pub mod lexicon;
mod processor;

pub use fusion::{FusionPolicy, OracleOutcome, normalize_label};
pub use lexicon::RuleSentimentScorer;
pub use processor::HybridSentimentProcessor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label with the score that produced it, both in `[0, 1]`-score space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub score: f64,
}

impl SentimentScore {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        Self { label, score }
    }
}

/// Fused verdict for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridResult {
    pub overall_sentiment: SentimentLabel,
    pub confidence: f64,
    /// Oracle verdict after label normalisation; mirrors the rule verdict when the oracle was absent
    pub ml_sentiment: SentimentScore,
    pub rule_sentiment: SentimentScore,
    pub agreement_score: f64,
}

/// A hybrid result keyed by the scene it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSentiment {
    pub scene_id: String,
    #[serde(flatten)]
    pub result: HybridResult,
}

/// Sentiment stage output for a whole script, ordered by scene number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysisOutput {
    pub script_id: String,
    /// Oracle model identifier, or "rule-only"
    pub model: String,
    pub oracle_available: bool,
    pub analyzed_at: DateTime<Utc>,
    pub scene_sentiments: Vec<SceneSentiment>,
}
