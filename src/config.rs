//! Grader configuration
//!
//! Behavioral settings for an assessment run, stored as TOML. This
//! intentionally excludes secrets (API keys live with the generation
//! collaborator). Validation tolerances and depth thresholds are fixed
//! constants in their engines, not configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RubricheckError};

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_min_word_count() -> usize {
    150
}

fn default_require_rubric() -> bool {
    true
}

/// Configuration for grading behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Model the generation collaborator should use
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Sampling temperature for the generation collaborator
    #[serde(default)]
    pub temperature: f64,
    /// Token budget for the generation collaborator
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Submissions below this word count are refused before generation
    #[serde(default = "default_min_word_count")]
    pub min_word_count: usize,
    /// Refuse to run against a rubric with no criteria
    #[serde(default = "default_require_rubric")]
    pub require_rubric: bool,
}

impl Default for GraderConfig {
    fn default() -> Self {
        GraderConfig {
            model_name: default_model_name(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            min_word_count: default_min_word_count(),
            require_rubric: default_require_rubric(),
        }
    }
}

impl GraderConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GraderConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RubricheckError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
