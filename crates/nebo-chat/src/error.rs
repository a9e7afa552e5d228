//! Error types for configuration loading and permission backends.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while loading chat configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid YAML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A format entry is unusable.
    #[error("Invalid format entry '{id}': {reason}")]
    InvalidEntry { id: String, reason: String },
}

impl ConfigError {
    pub fn invalid_entry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// A permission backend failed to answer.
///
/// Never propagated out of rendering: a failed check counts as denied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Permission check for '{node}' failed: {reason}")]
pub struct PermissionError {
    pub node: String,
    pub reason: String,
}

impl PermissionError {
    pub fn new(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            reason: reason.into(),
        }
    }
}
