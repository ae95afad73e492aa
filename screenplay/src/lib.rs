//! screenplay - scene/beat segmentation and hybrid sentiment for screenplay documents
//!
//! The pipeline runs in two passes:
//! 1. [`segment::Segmenter`] carves a normalized document into scenes, beats
//!    and character cues.
//! 2. [`sentiment::HybridSentimentProcessor`] scores every scene with the
//!    lexicon scorer, consults an optional [`sentiment_oracle::SentimentOracle`],
//!    and fuses both verdicts.
//!
//! [`features`] and [`join`] produce the per-scene counting features and the
//! id-keyed join consumed by reporting.

pub mod config;
pub mod error;
pub mod features;
pub mod join;
pub mod segment;
pub mod sentiment;

pub use config::{FeatureConfig, ScreenplayConfig, SegmentConfig, SentimentConfig};
pub use error::{Result, ScreenplayError};
pub use segment::{Beat, Scene, SegmentedScript, Segmenter};
pub use sentiment::{HybridResult, HybridSentimentProcessor, SentimentLabel};
