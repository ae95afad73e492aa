use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{OracleError, Result};

pub const DEFAULT_PRESET: &str = "hf-multilingual";
const DEFAULT_MODEL: &str = "nlptown/bert-base-multilingual-uncased-sentiment";

/// Classifier configuration, stored at `~/.config/preprod/oracle.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Preset used when the caller doesn't name one
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Named classifier presets
    #[serde(default)]
    pub presets: HashMap<String, ModelPreset>,

    /// Provider-specific configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}

/// A named classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPreset {
    /// Provider identifier (huggingface, command)
    pub provider: String,

    /// Model name/identifier for the provider
    pub model: String,
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Path to the classifier executable (for the command provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_path: Option<PathBuf>,

    /// Custom base URL (for HTTP providers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OracleConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: OracleConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| OracleError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/preprod/oracle.toml"))
    }

    /// Get a preset by name
    pub fn get_preset(&self, name: &str) -> Result<&ModelPreset> {
        self.presets
            .get(name)
            .ok_or_else(|| OracleError::InvalidPreset(name.to_string()))
    }

    /// Resolve an optional preset name, falling back to `default_preset`
    pub fn resolve_preset(&self, name: Option<&str>) -> Result<&ModelPreset> {
        self.get_preset(name.unwrap_or(&self.default_preset))
    }

    /// Get provider config by provider name
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        let mut presets = HashMap::new();

        presets.insert(
            DEFAULT_PRESET.to_string(),
            ModelPreset {
                provider: "huggingface".to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
        );

        Self {
            default_preset: DEFAULT_PRESET.to_string(),
            presets,
            providers: HashMap::new(),
        }
    }
}
