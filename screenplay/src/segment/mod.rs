//! Structural segmentation: scenes, beats, headings and character cues.

pub mod beats;
pub mod characters;
pub mod heading;
mod storage;

pub use characters::CueRules;
pub use heading::{HeadingMatch, HeadingMatcher, HeadingParser, ParsedHeading};
pub use storage::StoredScene;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::SegmentConfig;
use crate::error::Result;

/// One non-blank line of a scene body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    pub id: String,
    pub scene_number: usize,
    /// 1-based position within the scene
    #[serde(rename = "index")]
    pub number: usize,
    pub text: String,
}

impl Beat {
    pub fn new(scene_number: usize, number: usize, text: String) -> Self {
        Self {
            id: format!("beat_{}-{}", scene_number, number),
            scene_number,
            number,
            text,
        }
    }
}

/// A contiguous span of the document introduced by a heading line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    /// 1-based order of appearance
    pub number: usize,
    pub heading: String,
    pub location: Option<String>,
    pub time_of_day: Option<String>,
    pub characters: BTreeSet<String>,
    /// Body text between this heading and the next, trimmed
    pub text: String,
    pub beats: Vec<Beat>,
}

/// Scene id for a 1-based scene number. Stable across runs on the same input.
pub fn scene_id(number: usize) -> String {
    format!("scene_{}", number)
}

/// Segmentation output for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentedScript {
    pub script_id: String,
    pub scenes: Vec<Scene>,
}

/// Body span of each heading: from the end of its line up to the next heading.
///
/// Text before the first heading belongs to no scene.
pub fn split_scenes<'a>(text: &'a str, matches: &[HeadingMatch]) -> Vec<&'a str> {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let end = matches
                .get(i + 1)
                .map(|next| next.start_offset)
                .unwrap_or(text.len());
            text[m.end_offset()..end].trim()
        })
        .collect()
}

/// Splits normalized screenplay text into scenes.
#[derive(Debug, Clone)]
pub struct Segmenter {
    matcher: HeadingMatcher,
    parser: HeadingParser,
    cues: CueRules,
}

impl Segmenter {
    pub fn new(config: &SegmentConfig) -> Result<Self> {
        Ok(Self {
            matcher: HeadingMatcher::new(&config.heading_keywords)?,
            parser: HeadingParser::new(&config.heading_keywords)?,
            cues: CueRules::from(config),
        })
    }

    /// Build the scene for one heading and its body.
    fn build_scene(&self, number: usize, heading: &HeadingMatch, body: &str) -> Scene {
        let heading = heading.matched_text.trim().to_string();
        let parsed = self.parser.parse(&heading);
        let lines = beats::body_lines(body);

        Scene {
            id: scene_id(number),
            number,
            location: parsed.location,
            time_of_day: parsed.time_of_day,
            characters: characters::detect_character_names(&lines, &self.cues),
            beats: beats::extract_beats(number, body),
            heading,
            text: body.to_string(),
        }
    }

    /// Segment a document. Zero headings yields zero scenes, whatever the length.
    pub fn segment(&self, script_id: &str, text: &str) -> SegmentedScript {
        let matches = self.matcher.find_all(text);

        if matches.is_empty() && !text.trim().is_empty() {
            warn!(
                "No scene headings found in script {}; producing no scenes",
                script_id
            );
        }

        let scenes: Vec<Scene> = split_scenes(text, &matches)
            .into_iter()
            .zip(&matches)
            .enumerate()
            .map(|(i, (body, heading))| self.build_scene(i + 1, heading, body))
            .collect();

        debug!("Segmented script {} into {} scenes", script_id, scenes.len());

        SegmentedScript {
            script_id: script_id.to_string(),
            scenes,
        }
    }
}
