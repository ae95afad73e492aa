//! Sentiment classifiers for the preprod pipeline
//!
//! Provides a unified interface over interchangeable classifier backends:
//! - Hugging Face inference API (HTTP)
//! - Local classifier command (subprocess)
//! - Mock oracle for deterministic tests

pub mod config;
pub mod error;
pub mod oracle;
pub mod providers;

pub use config::{ModelPreset, OracleConfig, ProviderConfig};
pub use error::{OracleError, Result};
pub use oracle::{Classification, SentimentOracle};
pub use providers::{MockOracle, ProviderKind, get_oracle};
