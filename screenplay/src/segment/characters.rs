//! Character cue detection.
//!
//! A screenplay introduces dialogue with a short, unpunctuated cue line
//! ("JOHN", "MARY (V.O.)") followed by a parenthetical or a line of speech.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::config::SegmentConfig;

/// Thresholds for the cue heuristic.
#[derive(Debug, Clone)]
pub struct CueRules {
    pub max_name_tokens: usize,
    pub min_dialogue_chars: usize,
    pub terminators: Vec<char>,
}

impl Default for CueRules {
    fn default() -> Self {
        Self::from(&SegmentConfig::default())
    }
}

impl From<&SegmentConfig> for CueRules {
    fn from(config: &SegmentConfig) -> Self {
        Self {
            max_name_tokens: config.max_name_tokens,
            min_dialogue_chars: config.min_dialogue_chars,
            terminators: config.name_terminators.chars().collect(),
        }
    }
}

impl CueRules {
    fn is_candidate(&self, line: &str) -> bool {
        line.split_whitespace().count() <= self.max_name_tokens
            && !line.starts_with('(')
            && !line.ends_with(self.terminators.as_slice())
    }

    fn introduces_dialogue(&self, next: &str) -> bool {
        next.starts_with('(') || next.chars().count() > self.min_dialogue_chars
    }
}

static NON_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}_]").unwrap());

/// Keep letters, decimal digits and underscores only.
fn clean_name(line: &str) -> String {
    NON_NAME.replace_all(line, "").into_owned()
}

/// Collect the character names cued in a scene.
///
/// `lines` are the scene's non-blank, trimmed lines. The last line never
/// qualifies since there is no following line to check.
pub fn detect_character_names(lines: &[&str], rules: &CueRules) -> BTreeSet<String> {
    lines
        .windows(2)
        .filter(|pair| rules.is_candidate(pair[0]) && rules.introduces_dialogue(pair[1]))
        .map(|pair| clean_name(pair[0]))
        .filter(|name| !name.is_empty())
        .collect()
}
