//! cli
//!
//! Command-line interface layer for jagged.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Start logging at the configured level
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI is a thin caller of [`crate::bridge`]. Revisions are resolved to
//! ids through [`crate::git::GitStore`]; everything after that goes through
//! bridge operations only.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::{Config, ConfigLoadResult};
use crate::logging;
use crate::ui::output::{self, Verbosity};

/// Execution context built from global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Directory to run in (defaults to the process cwd)
    pub cwd: Option<PathBuf>,
    /// Debug output requested
    pub debug: bool,
    /// Minimal output requested
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// The directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    let loaded = if cli.command.reads_config() {
        Config::load(None).context("Failed to load config")?
    } else {
        ConfigLoadResult::default()
    };
    let level = if ctx.debug {
        "debug"
    } else {
        loaded.config.log_level()
    };
    logging::init_logging(level).map_err(anyhow::Error::msg)?;

    for warning in &loaded.warnings {
        output::warn(
            format_args!("{} ({})", warning.message, warning.path.display()),
            ctx.verbosity(),
        );
    }

    commands::dispatch(cli.command, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_cwd_wins() {
        let ctx = Context {
            cwd: Some(PathBuf::from("/tmp/somewhere")),
            ..Default::default()
        };
        assert_eq!(ctx.cwd().unwrap(), PathBuf::from("/tmp/somewhere"));
    }

    #[test]
    fn verbosity_from_flags() {
        let ctx = Context {
            quiet: true,
            debug: true,
            ..Default::default()
        };
        assert_eq!(ctx.verbosity(), Verbosity::Quiet);
    }
}
