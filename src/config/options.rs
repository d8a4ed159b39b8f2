//! Per-run conversion settings: trial strings and emission options

use crate::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trial allowance used when none is supplied (one hour)
pub const DEFAULT_TRIAL_ALLOWANCE: &str = "PT1H";

/// Trial window used when none is supplied (seven days)
pub const DEFAULT_TRIAL_WINDOW: &str = "P7D";

/// Trial allowance and window, as ISO-8601 duration literals
///
/// Passed through to the output verbatim; the converter never validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialConfig {
    pub allowance: String,
    pub window: String,
}

impl TrialConfig {
    pub fn new(allowance: impl Into<String>, window: impl Into<String>) -> Self {
        Self {
            allowance: allowance.into(),
            window: window.into(),
        }
    }

    /// Build from optional user input, falling back to the defaults for
    /// values that are missing or empty
    pub fn resolve(allowance: Option<String>, window: Option<String>) -> Self {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            allowance: or_default(allowance, DEFAULT_TRIAL_ALLOWANCE),
            window: or_default(window, DEFAULT_TRIAL_WINDOW),
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRIAL_ALLOWANCE, DEFAULT_TRIAL_WINDOW)
    }
}

/// How collection blocks with no items are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCollections {
    /// compatibility, categories and tags keep their header;
    /// resources, features and obfuscation are dropped entirely
    #[default]
    Legacy,
    /// Every collection block keeps its header
    Always,
    /// No empty collection block is written
    Omit,
}

impl fmt::Display for EmptyCollections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyCollections::Legacy => write!(f, "legacy"),
            EmptyCollections::Always => write!(f, "always"),
            EmptyCollections::Omit => write!(f, "omit"),
        }
    }
}

impl FromStr for EmptyCollections {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(EmptyCollections::Legacy),
            "always" => Ok(EmptyCollections::Always),
            "omit" => Ok(EmptyCollections::Omit),
            _ => Err(ConvertError::Config(format!(
                "Invalid empty collection policy '{}'. Must be one of: legacy, always, omit",
                s
            ))),
        }
    }
}

/// Emission behaviour switches. The default reproduces the legacy output byte for byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub empty_collections: EmptyCollections,

    /// Reject values containing line breaks instead of writing them verbatim
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_defaults() {
        let trial = TrialConfig::default();
        assert_eq!(trial.allowance, "PT1H");
        assert_eq!(trial.window, "P7D");
    }

    #[test]
    fn test_resolve_empty_falls_back() {
        let trial = TrialConfig::resolve(Some(String::new()), None);
        assert_eq!(trial, TrialConfig::default());
    }

    #[test]
    fn test_resolve_keeps_supplied_values() {
        let trial = TrialConfig::resolve(Some("PT2H".into()), Some("not-a-duration".into()));
        assert_eq!(trial.allowance, "PT2H");
        assert_eq!(trial.window, "not-a-duration");
    }

    #[test]
    fn test_empty_collections_from_str() {
        assert_eq!("legacy".parse::<EmptyCollections>().unwrap(), EmptyCollections::Legacy);
        assert_eq!("ALWAYS".parse::<EmptyCollections>().unwrap(), EmptyCollections::Always);
        assert_eq!("omit".parse::<EmptyCollections>().unwrap(), EmptyCollections::Omit);
        assert!("sometimes".parse::<EmptyCollections>().is_err());
    }

    #[test]
    fn test_default_options_are_legacy() {
        let options = EmitOptions::default();
        assert_eq!(options.empty_collections, EmptyCollections::Legacy);
        assert!(!options.strict);
    }
}
