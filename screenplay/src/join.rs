//! Id-keyed join of scene features with scene sentiment.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::features::{FeatureExtractionOutput, SceneFeatures};
use crate::sentiment::{HybridResult, SentimentAnalysisOutput};

/// Everything reporting needs about one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedScene {
    #[serde(flatten)]
    pub features: SceneFeatures,
    #[serde(flatten)]
    pub sentiment: HybridResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedScript {
    pub script_id: String,
    pub fused_scenes: Vec<FusedScene>,
}

/// Pair each scene's features with its sentiment, matching on scene id.
///
/// Output follows feature order. Scenes without a sentiment entry are
/// skipped; entries are never paired by position.
pub fn join_scene_data(
    features: &FeatureExtractionOutput,
    sentiment: &SentimentAnalysisOutput,
) -> JoinedScript {
    let by_id: HashMap<&str, &HybridResult> = sentiment
        .scene_sentiments
        .iter()
        .map(|s| (s.scene_id.as_str(), &s.result))
        .collect();

    let fused_scenes = features
        .scene_features
        .iter()
        .filter_map(|f| match by_id.get(f.scene_id.as_str()) {
            Some(result) => Some(FusedScene {
                features: f.clone(),
                sentiment: **result,
            }),
            None => {
                warn!("No sentiment data for scene {}; skipping", f.scene_id);
                None
            }
        })
        .collect();

    JoinedScript {
        script_id: features.script_id.clone(),
        fused_scenes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{SceneSentiment, SentimentLabel, SentimentScore};
    use chrono::Utc;

    fn features(ids: &[&str]) -> FeatureExtractionOutput {
        FeatureExtractionOutput {
            script_id: "s".to_string(),
            scene_features: ids
                .iter()
                .enumerate()
                .map(|(i, id)| SceneFeatures {
                    scene_id: id.to_string(),
                    word_count: i * 10,
                    character_count: 0,
                    is_ext: false,
                    is_night: false,
                    location_switched: false,
                    avg_sentence_length: 0.0,
                })
                .collect(),
        }
    }

    fn result(label: SentimentLabel) -> HybridResult {
        let score = SentimentScore::new(label, 0.5);
        HybridResult {
            overall_sentiment: label,
            confidence: 0.5,
            ml_sentiment: score,
            rule_sentiment: score,
            agreement_score: 1.0,
        }
    }

    fn sentiment(entries: &[(&str, SentimentLabel)]) -> SentimentAnalysisOutput {
        SentimentAnalysisOutput {
            script_id: "s".to_string(),
            model: "rule-only".to_string(),
            oracle_available: false,
            analyzed_at: Utc::now(),
            scene_sentiments: entries
                .iter()
                .map(|(id, label)| SceneSentiment {
                    scene_id: id.to_string(),
                    result: result(*label),
                })
                .collect(),
        }
    }

    #[test]
    fn test_join_by_id_not_position() {
        let joined = join_scene_data(
            &features(&["scene_1", "scene_2"]),
            &sentiment(&[
                ("scene_2", SentimentLabel::Negative),
                ("scene_1", SentimentLabel::Positive),
            ]),
        );

        assert_eq!(joined.fused_scenes.len(), 2);
        assert_eq!(joined.fused_scenes[0].features.scene_id, "scene_1");
        assert_eq!(
            joined.fused_scenes[0].sentiment.overall_sentiment,
            SentimentLabel::Positive
        );
        assert_eq!(
            joined.fused_scenes[1].sentiment.overall_sentiment,
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_missing_sentiment_skipped() {
        let _ = env_logger::builder().is_test(true).try_init();
        let joined = join_scene_data(
            &features(&["scene_1", "scene_2", "scene_3"]),
            &sentiment(&[
                ("scene_1", SentimentLabel::Neutral),
                ("scene_3", SentimentLabel::Neutral),
            ]),
        );

        let ids: Vec<&str> = joined
            .fused_scenes
            .iter()
            .map(|f| f.features.scene_id.as_str())
            .collect();
        assert_eq!(ids, vec!["scene_1", "scene_3"]);
        assert_eq!(joined.fused_scenes[1].features.word_count, 20);
    }

    #[test]
    fn test_fused_scene_is_flat() {
        let joined = join_scene_data(
            &features(&["scene_1"]),
            &sentiment(&[("scene_1", SentimentLabel::Positive)]),
        );
        let json = serde_json::to_value(&joined).unwrap();
        let scene = &json["fusedScenes"][0];
        assert_eq!(json["scriptId"], "s");
        assert_eq!(scene["sceneId"], "scene_1");
        assert_eq!(scene["wordCount"], 0);
        assert_eq!(scene["overallSentiment"], "positive");
        assert_eq!(scene["agreementScore"], 1.0);
    }
}
