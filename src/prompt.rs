//! Interactive prompts for values not given on the command line

use crate::{ConvertError, Result};
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Asks the user for the search directory and trial strings
pub struct Prompter {
    theme: ColorfulTheme,
}

impl std::fmt::Debug for Prompter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompter").finish_non_exhaustive()
    }
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Whether prompting makes sense (stdin and stderr attached to a terminal)
    pub fn is_interactive() -> bool {
        std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
    }

    /// Ask for the directory to search for XML manifests
    pub fn directory(&self) -> Result<PathBuf> {
        let dir: String = Input::with_theme(&self.theme)
            .with_prompt("Directory to search for XML files")
            .interact_text()
            .map_err(|e| ConvertError::Other(format!("Failed to read directory: {}", e)))?;
        Ok(PathBuf::from(dir.trim()))
    }

    /// Ask for the trial allowance; an empty answer keeps `default`
    pub fn trial_allowance(&self, default: &str) -> String {
        self.duration(
            "Trial allowance (ISO 8601 duration, e.g. PT1H for one hour)",
            default,
        )
    }

    /// Ask for the trial window; an empty answer keeps `default`
    pub fn trial_window(&self, default: &str) -> String {
        self.duration(
            "Trial window (ISO 8601 duration, e.g. P7D for seven days)",
            default,
        )
    }

    fn duration(&self, prompt: &str, default: &str) -> String {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Prompt failed, keeping default");
                default.to_string()
            });

        if answer.is_empty() {
            default.to_string()
        } else {
            answer
        }
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}
