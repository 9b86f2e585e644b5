//! Configuration for a placeholder node

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::NumberFormat;

/// Errors that can occur when loading a node configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration options for a [`PlaceholderNode`](super::PlaceholderNode)
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Separators for mapping values and rendered numbers
    pub number_format: NumberFormat,

    /// Reject templates that are empty or contain no placeholder
    pub require_placeholders: bool,

    /// Language for localized validation messages
    pub language: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            number_format: NumberFormat::default(),
            require_placeholders: true,
            language: "en".to_string(),
        }
    }
}

/// TOML structure for deserializing node configurations
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    language: Option<String>,
    require_placeholders: Option<bool>,
    format: Option<TomlFormat>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFormat {
    group: Option<String>,
    decimal: Option<String>,
}

impl NodeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number separators
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Set whether every template needs at least one placeholder
    pub fn with_require_placeholders(mut self, required: bool) -> Self {
        self.require_placeholders = required;
        self
    }

    /// Set the message language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string; missing keys keep defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(language) = parsed.language {
            config.language = language;
        }
        if let Some(required) = parsed.require_placeholders {
            config.require_placeholders = required;
        }
        if let Some(format) = parsed.format {
            if let Some(group) = format.group {
                config.number_format.group_separator = group;
            }
            if let Some(decimal) = format.decimal {
                config.number_format.decimal_separator = decimal;
            }
        }
        Ok(config)
    }
}
