//! Chat configuration loading.
//!
//! The configuration file is YAML:
//!
//! ```yaml
//! debug: false
//! settings:
//!   parse-player-colors: true
//! formats:
//!   default:
//!     format: "<gray>{display_name}</gray> <white>{message}</white>"
//!   admin:
//!     format: "<red>[Admin]</red> {display_name}: {message}"
//!     permission: "nebo.format.admin"
//! ```
//!
//! Format order in the file is resolution order. A broken format entry is
//! skipped with a warning instead of failing the whole load; only an
//! unreadable file or invalid YAML is an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::ConfigError;
use crate::format::FormatTemplate;

/// Runtime toggles that can change without touching the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Per-message diagnostics.
    pub debug: bool,
    /// Translate legacy codes and gradient macros in player messages.
    pub legacy_mixing: bool,
}

/// A parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatConfig {
    pub settings: Settings,
    /// Templates in file order.
    pub templates: Vec<FormatTemplate>,
    source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    debug: bool,
    settings: Option<RawSettings>,
    formats: Option<Mapping>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(rename = "parse-player-colors", default = "enabled")]
    parse_player_colors: bool,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    format: String,
    #[serde(default)]
    permission: Option<String>,
    // Deprecated; read so old files still load, never used.
    #[serde(rename = "legacy-format", default)]
    #[allow(dead_code)]
    legacy_format: Option<String>,
}

fn enabled() -> bool {
    true
}

impl ChatConfig {
    /// A configuration built in code rather than read from a file.
    pub fn new(settings: Settings, templates: Vec<FormatTemplate>) -> Self {
        Self {
            settings,
            templates,
            source_path: None,
        }
    }

    /// Parses a configuration from YAML text.
    ///
    /// `parse-player-colors` defaults to on when the `settings` section is
    /// present, and to off when the section is missing entirely.
    ///
    /// ```rust
    /// use nebo_chat::ChatConfig;
    ///
    /// let config = ChatConfig::from_yaml(r#"
    /// settings:
    ///   parse-player-colors: true
    /// formats:
    ///   default:
    ///     format: "{display_name}: {message}"
    /// "#).unwrap();
    /// assert!(config.settings.legacy_mixing);
    /// assert_eq!(config.templates.len(), 1);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty file is an empty configuration, not a parse error.
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig {
                debug: false,
                settings: None,
                formats: None,
            }
        } else {
            serde_yaml::from_str(yaml)?
        };

        let templates = match raw.formats {
            Some(formats) => load_formats(formats),
            None => {
                warn!("no 'formats' section in config, using the built-in default format");
                Vec::new()
            }
        };

        Ok(Self {
            settings: Settings {
                debug: raw.debug,
                legacy_mixing: raw.settings.is_some_and(|s| s.parse_player_colors),
            },
            templates,
            source_path: None,
        })
    }

    /// Reads and parses a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// The file this configuration was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Re-reads the configuration from its source file.
    ///
    /// Leaves `self` untouched on error.
    pub fn refresh(&mut self) -> Result<(), ConfigError> {
        let path = self.source_path.clone().ok_or_else(|| {
            ConfigError::invalid_entry("<config>", "cannot refresh: not loaded from a file")
        })?;
        *self = Self::from_file(path)?;
        Ok(())
    }
}

fn load_formats(formats: Mapping) -> Vec<FormatTemplate> {
    let mut templates = Vec::with_capacity(formats.len());
    for (key, value) in formats {
        match load_format(key, value) {
            Ok(template) => templates.push(template),
            Err(err) => warn!(error = %err, "skipping format entry"),
        }
    }
    templates
}

fn load_format(key: Value, value: Value) -> Result<FormatTemplate, ConfigError> {
    let id = match key {
        Value::String(id) => id,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(ConfigError::invalid_entry(
                format!("{:?}", other),
                "format ids must be plain strings",
            ))
        }
    };
    if !value.is_mapping() {
        return Err(ConfigError::invalid_entry(id, "expected a mapping with a 'format' key"));
    }
    let raw: RawFormat = serde_yaml::from_value(value)
        .map_err(|e| ConfigError::invalid_entry(id.clone(), e.to_string()))?;
    Ok(FormatTemplate::validated(id, raw.format, raw.permission))
}
