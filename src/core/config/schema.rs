//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$JAGGED_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/jagged/config.toml`
//! 3. `~/.jagged/config.toml`
//!
//! # Repo Config
//!
//! Located at `<git_dir>/jagged/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., abbreviation length
//! must be a usable id prefix).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::ObjectId;

/// Log levels accepted by `log_level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Shortest abbreviation accepted, matching git's `core.abbrev` floor.
pub const MIN_ABBREV: usize = 4;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// log_level = "warn"
///
/// [output]
/// abbrev = 7
///
/// [log]
/// max_count = 20
/// first_parent = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default log level
    pub log_level: Option<String>,

    /// Output formatting
    pub output: Option<OutputConfig>,

    /// History walk defaults
    pub log: Option<LogConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.log_level {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log_level '{}', must be one of: {}",
                    level,
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
        }

        if let Some(output) = &self.output {
            output.validate()?;
        }
        if let Some(log) = &self.log {
            log.validate()?;
        }

        Ok(())
    }
}

/// Repository configuration.
///
/// Same sections as the global config, minus `log_level`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Output formatting
    pub output: Option<OutputConfig>,

    /// History walk defaults
    pub log: Option<LogConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(output) = &self.output {
            output.validate()?;
        }
        if let Some(log) = &self.log {
            log.validate()?;
        }
        Ok(())
    }
}

/// Output formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Hex digits shown for abbreviated ids
    pub abbrev: Option<usize>,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(abbrev) = self.abbrev {
            if !(MIN_ABBREV..=ObjectId::HEX_LEN).contains(&abbrev) {
                return Err(ConfigError::InvalidValue(format!(
                    "output.abbrev must be between {} and {}, got {}",
                    MIN_ABBREV,
                    ObjectId::HEX_LEN,
                    abbrev
                )));
            }
        }
        Ok(())
    }
}

/// Defaults for `jagged log`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Commits printed when `-n` is not given
    pub max_count: Option<usize>,

    /// Follow only first parents
    pub first_parent: Option<bool>,
}

impl LogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == Some(0) {
            return Err(ConfigError::InvalidValue(
                "log.max_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
