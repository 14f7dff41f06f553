//! Error types shared across the rules engine.

use std::path::PathBuf;
use thiserror::Error;

/// Structurally invalid input: an integration bug, not a player mistake.
///
/// Rule violations a player can trigger (overspending point buy, picking a
/// homebrew race) never produce this; they come back as structured results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl RulesError {
    pub fn malformed(message: impl Into<String>) -> Self {
        RulesError::MalformedInput(message.into())
    }
}

/// Error loading configuration or reference data from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported file extension for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Rules(#[from] RulesError),
}
