//! Configuration parsing and management.
//!
//! Pipelines keep their stamping defaults in a `verstamp.toml` file so the
//! same build and major components are used on every invocation:
//!
//! ```toml
//! [stamp]
//! build = 1
//! major = 0
//! shape = "four"
//! clock = "utc"
//!
//! [log]
//! level = "info"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::clock::ClockKind;

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "verstamp.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StampConfig {
    /// Version stamping defaults.
    #[serde(default)]
    pub stamp: StampSection,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl StampConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML is invalid or contains unknown keys
    /// - `shape = "three"` is combined with a non-zero `major`
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.stamp.shape == TupleShape::Three && self.stamp.major != 0 {
            return Err(ConfigError::Validation(format!(
                "[stamp] major = {} has no effect with shape = \"three\"; \
                 three-part versions carry no major component",
                self.stamp.major
            )));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[log] level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Defaults for `verstamp encode`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StampSection {
    /// Build component.
    #[serde(default)]
    pub build: i32,

    /// Major component (four-part versions only).
    #[serde(default)]
    pub major: i32,

    /// Which tuple shape to emit.
    #[serde(default)]
    pub shape: TupleShape,

    /// How to read timestamps written without an offset.
    #[serde(default)]
    pub clock: ClockKind,
}

/// Number of components in an emitted version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TupleShape {
    /// `build.minor.revision`
    Three,
    /// `build.major.minor.revision`
    #[default]
    Four,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
