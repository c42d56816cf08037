//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! jagged has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$JAGGED_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/jagged/config.toml`
//! 3. `~/.jagged/config.toml`
//!
//! # Repo Config Location
//!
//! `<git_dir>/jagged/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use jagged::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! let config = result.config;
//!
//! println!("abbrev: {}", config.abbrev());
//! println!("log count: {}", config.max_count());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LogConfig, OutputConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "JAGGED_CONFIG";

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_ABBREV: usize = 7;
const DEFAULT_MAX_COUNT: usize = 20;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug, Default)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically. Repo config overrides global
/// config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

/// Fully resolved settings, as printed by `jagged config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub log_level: String,
    pub output: EffectiveOutput,
    pub log: EffectiveLog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveOutput {
    pub abbrev: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveLog {
    pub max_count: usize,
    pub first_parent: bool,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(git_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let global_path = Self::find_global(&mut warnings);
        let mut result = Self::load_from(global_path.as_deref(), git_dir)?;
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        Ok(result)
    }

    /// Load configuration from an explicit global file and repository.
    ///
    /// A `global_path` that does not exist is treated as absent.
    pub fn load_from(
        global_path: Option<&Path>,
        git_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let (global, global_path) = match global_path.filter(|path| path.exists()) {
            Some(path) => (read_config::<GlobalConfig>(path)?, Some(path.to_path_buf())),
            None => (GlobalConfig::default(), None),
        };

        let (repo, repo_path) = match git_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => (Some(read_config::<RepoConfig>(&path)?), Some(path)),
            _ => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path,
                repo_path,
            },
            warnings: Vec::new(),
        })
    }

    /// Locate the global config file, if any.
    fn find_global(warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        // 1. Check $JAGGED_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("{CONFIG_ENV} points at a missing file, ignoring it"),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/jagged/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("jagged/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.jagged/config.toml
        dirs::home_dir()
            .map(|home| home.join(".jagged/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for repo config.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("jagged/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Log level. Defaults to "warn".
    pub fn log_level(&self) -> &str {
        self.global.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Hex digits for abbreviated ids. Defaults to 7.
    pub fn abbrev(&self) -> usize {
        self.repo
            .as_ref()
            .and_then(|r| r.output.as_ref())
            .and_then(|o| o.abbrev)
            .or_else(|| self.global.output.as_ref().and_then(|o| o.abbrev))
            .unwrap_or(DEFAULT_ABBREV)
    }

    /// Default history length for `jagged log`. Defaults to 20.
    pub fn max_count(&self) -> usize {
        self.log_setting(|l| l.max_count).unwrap_or(DEFAULT_MAX_COUNT)
    }

    /// Whether `jagged log` follows only first parents. Defaults to `true`.
    pub fn first_parent(&self) -> bool {
        self.log_setting(|l| l.first_parent).unwrap_or(true)
    }

    fn log_setting<T>(&self, get: impl Fn(&LogConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|r| r.log.as_ref())
            .and_then(&get)
            .or_else(|| self.global.log.as_ref().and_then(&get))
    }

    /// Resolve every setting.
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            log_level: self.log_level().to_string(),
            output: EffectiveOutput {
                abbrev: self.abbrev(),
            },
            log: EffectiveLog {
                max_count: self.max_count(),
                first_parent: self.first_parent(),
            },
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

/// Read and parse a config file.
fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
