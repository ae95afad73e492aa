//! Classifier provider implementations

mod command;
mod huggingface;
pub mod mock;

pub use command::CommandOracle;
pub use huggingface::HuggingFaceOracle;
pub use mock::MockOracle;

use crate::config::{ModelPreset, ProviderConfig};
use crate::error::{OracleError, Result};
use crate::oracle::SentimentOracle;

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    HuggingFace,
    Command,
}

impl ProviderKind {
    /// Parse provider kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hugging-face" | "hf" => Ok(Self::HuggingFace),
            "command" | "cmd" | "local" => Ok(Self::Command),
            _ => Err(OracleError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::HuggingFace => Some("HF_API_TOKEN"),
            Self::Command => None,
        }
    }
}

/// Create a classifier instance from a preset and optional config
pub fn get_oracle(
    preset: &ModelPreset,
    provider_config: Option<&ProviderConfig>,
) -> Result<Box<dyn SentimentOracle>> {
    let kind = ProviderKind::from_str(&preset.provider)?;

    match kind {
        ProviderKind::HuggingFace => {
            let api_key = get_api_key(provider_config, "HF_API_TOKEN", "Hugging Face")?;
            let base_url = provider_config.and_then(|c| c.base_url.as_deref());
            Ok(Box::new(HuggingFaceOracle::new(
                &preset.model,
                api_key,
                base_url,
            )?))
        }
        ProviderKind::Command => {
            let command_path = provider_config.and_then(|c| c.command_path.clone());
            Ok(Box::new(CommandOracle::new(&preset.model, command_path)?))
        }
    }
}

/// Get API key from config or environment variable
fn get_api_key(
    config: Option<&ProviderConfig>,
    env_var: &str,
    provider_name: &str,
) -> Result<String> {
    if let Some(key) = config.and_then(|c| c.api_key.clone()) {
        return Ok(key);
    }

    std::env::var(env_var).map_err(|_| OracleError::MissingApiKey {
        provider: provider_name.to_string(),
        env_var: env_var.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!(
            ProviderKind::from_str("HuggingFace").unwrap(),
            ProviderKind::HuggingFace
        );
        assert_eq!(ProviderKind::from_str("hf").unwrap(), ProviderKind::HuggingFace);
        assert_eq!(ProviderKind::from_str("command").unwrap(), ProviderKind::Command);
        assert!(ProviderKind::from_str("transformers.js").is_err());
    }

    #[test]
    fn test_env_var() {
        assert_eq!(ProviderKind::HuggingFace.env_var(), Some("HF_API_TOKEN"));
        assert_eq!(ProviderKind::Command.env_var(), None);
    }

    #[test]
    fn test_api_key_from_config_wins() {
        let config = ProviderConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        let key = get_api_key(Some(&config), "PREPROD_TEST_UNSET_VAR", "Test").unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_missing_api_key() {
        let result = get_api_key(None, "PREPROD_TEST_UNSET_VAR", "Test");
        assert!(matches!(result, Err(OracleError::MissingApiKey { .. })));
    }

    #[test]
    fn test_get_oracle_with_configured_key() {
        let preset = ModelPreset {
            provider: "huggingface".to_string(),
            model: "nlptown/bert-base-multilingual-uncased-sentiment".to_string(),
        };
        let config = ProviderConfig {
            api_key: Some("hf_test".to_string()),
            ..Default::default()
        };
        let oracle = get_oracle(&preset, Some(&config)).unwrap();
        assert_eq!(oracle.name(), "Hugging Face");
        assert_eq!(oracle.model(), preset.model);
    }

    #[test]
    fn test_get_oracle_missing_command() {
        let preset = ModelPreset {
            provider: "command".to_string(),
            model: "default".to_string(),
        };
        let config = ProviderConfig {
            command_path: Some("/nonexistent/preprod-classify".into()),
            ..Default::default()
        };
        let result = get_oracle(&preset, Some(&config));
        assert!(matches!(result, Err(OracleError::Unavailable(_))));
    }
}
