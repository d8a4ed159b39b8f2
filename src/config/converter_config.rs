//! Converter configuration file handling
//!
//! Loads ~/.config/manifest-yml/config.yaml (or an explicit path). Every
//! setting is optional; anything left out falls back to the built-in defaults.

use super::options::{EmitOptions, EmptyCollections};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Trial values as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

/// manifest-yml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Trial allowance/window used for priced manifests
    #[serde(default)]
    pub trial: TrialSettings,

    /// Empty collection block policy
    #[serde(default)]
    pub empty_collections: EmptyCollections,

    /// Reject values that would break the output's line structure
    #[serde(default)]
    pub strict: bool,
}

impl ConverterConfig {
    /// Load configuration from the default path, or defaults if no file exists
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::ConvertError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading manifest-yml configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            empty_collections = %config.empty_collections,
            strict = config.strict,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving manifest-yml configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/manifest-yml/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("manifest-yml");
        path.push("config.yaml");
        path
    }

    /// Emission options described by this config
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            empty_collections: self.empty_collections,
            strict: self.strict,
        }
    }
}
