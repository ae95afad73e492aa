//! Per-scene production load and stylometric features.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;
use crate::segment::{Scene, SegmentedScript};

/// A run of non-terminators closed by one or more `.`, `!` or `?`
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFeatures {
    pub scene_id: String,
    pub word_count: usize,
    pub character_count: usize,
    pub is_ext: bool,
    pub is_night: bool,
    /// Location differs from the previous scene's
    pub location_switched: bool,
    pub avg_sentence_length: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureExtractionOutput {
    pub script_id: String,
    pub scene_features: Vec<SceneFeatures>,
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words per sentence. Text with no terminator is one sentence; blank text is 0.
pub fn avg_sentence_length(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let sentences = SENTENCE.find_iter(text).count().max(1);
    word_count(text) as f64 / sentences as f64
}

fn heading_flags(scene: &Scene, config: &FeatureConfig) -> (bool, bool) {
    let heading = scene.heading.to_lowercase();
    let is_ext = config
        .exterior_markers
        .iter()
        .any(|m| heading.starts_with(&m.to_lowercase()));
    let is_night = config
        .night_markers
        .iter()
        .any(|m| heading.contains(&m.to_lowercase()));
    (is_ext, is_night)
}

pub fn extract_features(script: &SegmentedScript, config: &FeatureConfig) -> FeatureExtractionOutput {
    let mut previous_location: Option<&str> = None;
    let mut scene_features = Vec::with_capacity(script.scenes.len());

    for scene in &script.scenes {
        let (is_ext, is_night) = heading_flags(scene, config);

        // A scene with no parsed location resets the comparison
        let location_switched =
            previous_location.is_some() && scene.location.as_deref() != previous_location;
        previous_location = scene.location.as_deref();

        scene_features.push(SceneFeatures {
            scene_id: scene.id.clone(),
            word_count: word_count(&scene.text),
            character_count: scene.characters.len(),
            is_ext,
            is_night,
            location_switched,
            avg_sentence_length: avg_sentence_length(&scene.text),
        });
    }

    FeatureExtractionOutput {
        script_id: script.script_id.clone(),
        scene_features,
    }
}
