use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Best-effort verdict returned by a classifier
///
/// `label` is whatever the backing model emits ("POSITIVE", "neg", "4 stars", ...);
/// callers normalise it themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Trait for sentiment classifiers
#[async_trait]
pub trait SentimentOracle: Send + Sync {
    /// Classify a piece of text
    async fn classify(&self, text: &str) -> Result<Classification>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Model identifier reported alongside results
    fn model(&self) -> &str;

    /// Check if the classifier can be called (API key set, command installed, etc.)
    fn is_available(&self) -> Result<()>;
}
