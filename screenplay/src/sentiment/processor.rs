//! Per-scene sentiment scoring over a whole segmented script.

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use sentiment_oracle::{OracleConfig, SentimentOracle, get_oracle};
use std::sync::Arc;
use std::time::Duration;

use super::fusion::{FusionPolicy, OracleOutcome};
use super::lexicon::RuleSentimentScorer;
use super::{HybridResult, SceneSentiment, SentimentAnalysisOutput};
use crate::config::SentimentConfig;
use crate::error::Result;
use crate::segment::{Scene, SegmentedScript};

const RULE_ONLY_MODEL: &str = "rule-only";

/// Scores scenes with the lexicon and, when one is configured, a classifier.
///
/// Classifier failures never escape a scene: the scene that hit the failure
/// is scored rule-only and the rest of the script carries on.
pub struct HybridSentimentProcessor {
    rules: RuleSentimentScorer,
    policy: FusionPolicy,
    oracle: Option<Arc<dyn SentimentOracle>>,
    timeout: Option<Duration>,
    max_concurrent: usize,
}

impl HybridSentimentProcessor {
    pub fn new(config: &SentimentConfig, oracle: Option<Arc<dyn SentimentOracle>>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            rules: RuleSentimentScorer::new(config),
            policy: FusionPolicy::from(config),
            oracle,
            timeout: config.oracle_timeout_secs.map(Duration::from_secs),
            max_concurrent: config.max_concurrent_scenes,
        })
    }

    /// Build the classifier from the oracle config. Any problem creating it
    /// (unknown preset, missing key, command not installed) leaves the
    /// processor rule-only.
    pub fn from_oracle_config(config: &SentimentConfig, oracle_config: &OracleConfig) -> Result<Self> {
        let oracle = match build_oracle(config, oracle_config) {
            Ok(oracle) => {
                info!("Using {} classifier {}", oracle.name(), oracle.model());
                Some(oracle)
            }
            Err(e) => {
                warn!("Sentiment classifier unavailable, scoring rule-only: {}", e);
                None
            }
        };

        Self::new(config, oracle)
    }

    /// Override the per-call classifier timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn oracle_available(&self) -> bool {
        self.oracle.is_some()
    }

    /// Model identifier reported in the analysis output.
    pub fn model(&self) -> String {
        self.oracle
            .as_ref()
            .map(|o| o.model().to_string())
            .unwrap_or_else(|| RULE_ONLY_MODEL.to_string())
    }

    /// Ask the classifier about one text, folding every failure into the outcome.
    async fn consult_oracle(&self, scene_id: &str, text: &str) -> OracleOutcome {
        let Some(oracle) = &self.oracle else {
            return OracleOutcome::Unavailable;
        };

        if text.trim().is_empty() {
            return OracleOutcome::Unavailable;
        }

        // A task of its own, so a panicking classifier only costs this scene
        let task_oracle = Arc::clone(oracle);
        let owned = text.to_string();
        let mut handle = tokio::spawn(async move { task_oracle.classify(&owned).await });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    handle.abort();
                    warn!(
                        "Classifier timed out after {:?} on {}; using rule score",
                        limit, scene_id
                    );
                    return OracleOutcome::Failed(format!("timed out after {:?}", limit));
                }
            },
            None => handle.await,
        };

        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!("Classifier task aborted on {}: {}; using rule score", scene_id, e);
                return OracleOutcome::Failed(e.to_string());
            }
        };

        match result {
            Ok(classification) => {
                debug!(
                    "{}: classifier said {} ({:.3})",
                    scene_id, classification.label, classification.score
                );
                OracleOutcome::classified(&classification)
            }
            Err(e) => {
                warn!("Classifier failed on {}: {}; using rule score", scene_id, e);
                OracleOutcome::Failed(e.to_string())
            }
        }
    }

    /// Hybrid verdict for free text. `label` only appears in log lines.
    pub async fn score_text(&self, label: &str, text: &str) -> HybridResult {
        let rule = self.rules.score(text);
        let outcome = self.consult_oracle(label, text).await;
        self.policy.fuse(&rule, &outcome)
    }

    async fn score_scene(&self, scene: &Scene) -> (usize, SceneSentiment) {
        let result = self.score_text(&scene.id, &scene.text).await;
        (
            scene.number,
            SceneSentiment {
                scene_id: scene.id.clone(),
                result,
            },
        )
    }

    /// Score every scene of a script. Results come back in scene order
    /// whatever order the classifier calls complete in. Classifier calls are
    /// spawned, so this must run inside a Tokio runtime.
    pub async fn process_script(&self, script: &SegmentedScript) -> SentimentAnalysisOutput {
        info!(
            "Analyzing sentiment for {} scenes of {} ({} at a time)",
            script.scenes.len(),
            script.script_id,
            self.max_concurrent
        );

        let mut scored: Vec<(usize, SceneSentiment)> = stream::iter(&script.scenes)
            .map(|scene| self.score_scene(scene))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        scored.sort_by_key(|(number, _)| *number);

        SentimentAnalysisOutput {
            script_id: script.script_id.clone(),
            model: self.model(),
            oracle_available: self.oracle_available(),
            analyzed_at: Utc::now(),
            scene_sentiments: scored.into_iter().map(|(_, s)| s).collect(),
        }
    }
}

fn build_oracle(
    config: &SentimentConfig,
    oracle_config: &OracleConfig,
) -> sentiment_oracle::Result<Arc<dyn SentimentOracle>> {
    let preset = oracle_config.resolve_preset(config.oracle_preset.as_deref())?;
    let provider_config = oracle_config.get_provider_config(&preset.provider);
    let oracle = get_oracle(preset, provider_config)?;
    oracle.is_available()?;
    Ok(Arc::from(oracle))
}
