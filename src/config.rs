//! Configuration loading and management
//!
//! Handles parsing of `.taskdeps.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".taskdeps.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Snapshot location
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Suggestion scoring knobs
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

/// Snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotConfig {
    /// Default snapshot file, relative to the working directory
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("tasks.json")
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

/// Suggestion configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionConfig {
    /// Tokens shorter than this (in characters) are not keywords
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,

    /// Words never treated as keywords
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Suggestions scoring below this are dropped
    #[serde(default)]
    pub min_confidence: u8,

    /// Maximum number of suggestions returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

fn default_min_keyword_len() -> usize {
    3
}

fn default_stop_words() -> Vec<String> {
    [
        "the", "and", "for", "with", "this", "that", "will", "can", "should",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_keyword_len: default_min_keyword_len(),
            stop_words: default_stop_words(),
            min_confidence: 0,
            limit: None,
        }
    }
}

impl Config {
    /// Load configuration from a `.taskdeps.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.snapshot.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "snapshot.path cannot be empty".to_string(),
            ));
        }
        self.suggestions.validate()
    }
}

impl SuggestionConfig {
    fn validate(&self) -> Result<()> {
        if self.min_keyword_len == 0 {
            return Err(Error::InvalidConfig(
                "suggestions.min_keyword_len must be >= 1".to_string(),
            ));
        }
        if self.min_confidence > 100 {
            return Err(Error::InvalidConfig(
                "suggestions.min_confidence must be <= 100".to_string(),
            ));
        }
        if self.limit == Some(0) {
            return Err(Error::InvalidConfig(
                "suggestions.limit must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
