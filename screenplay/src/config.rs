//! Pipeline configuration: heading keywords, lexicons, thresholds and fusion weights.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScreenplayError;
use crate::sentiment::lexicon::{DEFAULT_NEGATIVE_WORDS, DEFAULT_POSITIVE_WORDS};

// Heading keywords, checked in order. "INT/EXT." comes first so it is stripped whole.
const DEFAULT_HEADING_KEYWORDS: &[&str] = &["INT/EXT.", "INT.", "EXT.", "داخلي", "خارجي"];

const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.6;
const DEFAULT_NEGATIVE_THRESHOLD: f64 = 0.4;
const DEFAULT_TRUST_THRESHOLD: f64 = 0.7;
const DEFAULT_AGREE_SCORE: f64 = 1.0;
const DEFAULT_DISAGREE_SCORE: f64 = 0.3;
const DEFAULT_ORACLE_WEIGHT: f64 = 0.7;
const DEFAULT_RULE_WEIGHT: f64 = 0.3;
const DEFAULT_AGREEMENT_WEIGHT: f64 = 0.2;
const DEFAULT_DIVISOR: f64 = 1.2;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenplayConfig {
    #[serde(default)]
    pub segment: SegmentConfig,

    #[serde(default)]
    pub sentiment: SentimentConfig,

    #[serde(default)]
    pub features: FeatureConfig,
}

/// Scene segmentation and character cue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Literal, line-anchored heading prefixes (matched case-insensitively)
    #[serde(default = "default_heading_keywords")]
    pub heading_keywords: Vec<String>,

    /// A character cue line has at most this many whitespace tokens
    #[serde(default = "default_max_name_tokens")]
    pub max_name_tokens: usize,

    /// A line longer than this (in characters) counts as dialogue after a cue
    #[serde(default = "default_min_dialogue_chars")]
    pub min_dialogue_chars: usize,

    /// A line ending in one of these characters is never a character cue
    #[serde(default = "default_name_terminators")]
    pub name_terminators: String,
}

/// Lexicon scoring and hybrid fusion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_positive_words")]
    pub positive_words: Vec<String>,

    #[serde(default = "default_negative_words")]
    pub negative_words: Vec<String>,

    /// Rule score strictly above this is positive
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,

    /// Rule score strictly below this is negative
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,

    /// Agreement above this trusts the oracle outright
    #[serde(default = "default_trust_threshold")]
    pub trust_threshold: f64,

    #[serde(default = "default_agree_score")]
    pub agree_score: f64,

    #[serde(default = "default_disagree_score")]
    pub disagree_score: f64,

    #[serde(default = "default_oracle_weight")]
    pub oracle_weight: f64,

    #[serde(default = "default_rule_weight")]
    pub rule_weight: f64,

    #[serde(default = "default_agreement_weight")]
    pub agreement_weight: f64,

    #[serde(default = "default_divisor")]
    pub divisor: f64,

    /// Oracle preset name; None uses the oracle config's default preset
    #[serde(default)]
    pub oracle_preset: Option<String>,

    /// Per-scene oracle timeout. None means wait as long as the oracle takes.
    #[serde(default)]
    pub oracle_timeout_secs: Option<u64>,

    /// Scenes scored at once
    #[serde(default = "default_max_concurrent_scenes")]
    pub max_concurrent_scenes: usize,
}

/// Markers for the heading-derived production features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Lowercase heading prefixes marking an exterior scene
    #[serde(default = "default_exterior_markers")]
    pub exterior_markers: Vec<String>,

    /// Lowercase heading substrings marking a night scene
    #[serde(default = "default_night_markers")]
    pub night_markers: Vec<String>,
}

fn default_heading_keywords() -> Vec<String> {
    to_strings(DEFAULT_HEADING_KEYWORDS)
}

fn default_max_name_tokens() -> usize {
    3
}

fn default_min_dialogue_chars() -> usize {
    15
}

fn default_name_terminators() -> String {
    ".?!,;:".to_string()
}

fn default_positive_words() -> Vec<String> {
    to_strings(DEFAULT_POSITIVE_WORDS)
}

fn default_negative_words() -> Vec<String> {
    to_strings(DEFAULT_NEGATIVE_WORDS)
}

fn default_positive_threshold() -> f64 {
    DEFAULT_POSITIVE_THRESHOLD
}

fn default_negative_threshold() -> f64 {
    DEFAULT_NEGATIVE_THRESHOLD
}

fn default_trust_threshold() -> f64 {
    DEFAULT_TRUST_THRESHOLD
}

fn default_agree_score() -> f64 {
    DEFAULT_AGREE_SCORE
}

fn default_disagree_score() -> f64 {
    DEFAULT_DISAGREE_SCORE
}

fn default_oracle_weight() -> f64 {
    DEFAULT_ORACLE_WEIGHT
}

fn default_rule_weight() -> f64 {
    DEFAULT_RULE_WEIGHT
}

fn default_agreement_weight() -> f64 {
    DEFAULT_AGREEMENT_WEIGHT
}

fn default_divisor() -> f64 {
    DEFAULT_DIVISOR
}

fn default_max_concurrent_scenes() -> usize {
    1
}

fn default_exterior_markers() -> Vec<String> {
    to_strings(&["ext", "خارجي"])
}

fn default_night_markers() -> Vec<String> {
    to_strings(&["night", "ليل"])
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            heading_keywords: default_heading_keywords(),
            max_name_tokens: default_max_name_tokens(),
            min_dialogue_chars: default_min_dialogue_chars(),
            name_terminators: default_name_terminators(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_words: default_positive_words(),
            negative_words: default_negative_words(),
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
            trust_threshold: default_trust_threshold(),
            agree_score: default_agree_score(),
            disagree_score: default_disagree_score(),
            oracle_weight: default_oracle_weight(),
            rule_weight: default_rule_weight(),
            agreement_weight: default_agreement_weight(),
            divisor: default_divisor(),
            oracle_preset: None,
            oracle_timeout_secs: None,
            max_concurrent_scenes: default_max_concurrent_scenes(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            exterior_markers: default_exterior_markers(),
            night_markers: default_night_markers(),
        }
    }
}

impl SentimentConfig {
    /// Reject threshold and weight combinations the fusion step cannot use.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.negative_threshold > self.positive_threshold {
            return Err(ScreenplayError::InvalidThresholds {
                positive: self.positive_threshold,
                negative: self.negative_threshold,
            });
        }
        if self.divisor <= 0.0 {
            return Err(ScreenplayError::InvalidDivisor(self.divisor));
        }
        if self.max_concurrent_scenes == 0 {
            return Err(ScreenplayError::ZeroConcurrency);
        }
        Ok(())
    }
}

impl ScreenplayConfig {
    /// Get the config file path: ~/.config/preprod/screenplay.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("preprod")
            .join("screenplay.toml"))
    }

    /// Load config from the default location, returning default if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from an explicit path, returning default if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: ScreenplayConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.sentiment.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
