//! config command - Print the effective configuration

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::Config;
use crate::git::GitStore;
use crate::logging;
use crate::ui::output;

/// Print the effective configuration as TOML.
///
/// Outside a repository only the global config applies.
pub fn config(ctx: &Context) -> Result<()> {
    let cwd = ctx.cwd()?;
    let git_dir = GitStore::open(&cwd)
        .ok()
        .map(|store| store.git_dir().to_path_buf());

    let loaded = Config::load(git_dir.as_deref()).context("Failed to load config")?;
    let config = loaded.config;
    let verbosity = ctx.verbosity();

    for (scope, path) in [
        ("global", config.global_config_loaded_from()),
        ("repo", config.repo_config_loaded_from()),
    ] {
        let source = path.map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string());
        output::debug(format_args!("{scope} config: {source}"), verbosity);
    }
    output::debug(
        format_args!("log level: {}", logging::logging_status().unwrap_or("off")),
        verbosity,
    );

    let text = toml::to_string_pretty(&config.effective()).context("Failed to serialize config")?;
    print!("{text}");
    Ok(())
}
