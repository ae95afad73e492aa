//! Errors raised while building segmenters and scorers from configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenplayError {
    #[error("No scene heading keywords configured")]
    EmptyKeywordList,

    #[error("Invalid scene heading pattern: {0}")]
    InvalidHeadingPattern(#[from] regex::Error),

    #[error(
        "Inconsistent sentiment thresholds: negative ({negative}) must not exceed positive ({positive})"
    )]
    InvalidThresholds { positive: f64, negative: f64 },

    #[error("Fusion divisor must be positive, got {0}")]
    InvalidDivisor(f64),

    #[error("Scene concurrency must be at least 1")]
    ZeroConcurrency,
}

pub type Result<T> = std::result::Result<T, ScreenplayError>;
