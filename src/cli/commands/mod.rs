//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves its revision argument to an object id
//! 2. Reads objects through bridge operations
//! 3. Formats and displays output
//!
//! Handlers never touch `git2` objects; the repository is read-only.

mod completion;
mod config_cmd;
mod log_cmd;
mod lookup;
mod ls_tree;
mod show;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::config;
pub use log_cmd::{log, walk};
pub use lookup::lookup;
pub use ls_tree::ls_tree;
pub use show::show;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::Context;
use crate::bridge::Repository;
use crate::core::config::Config;
use crate::core::types::ObjectId;
use crate::git::GitStore;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show { rev, json } => show::show(ctx, &rev, json),
        Command::LsTree { rev, json } => ls_tree::ls_tree(ctx, &rev, json),
        Command::Log {
            rev,
            max_count,
            all_parents,
        } => log_cmd::log(ctx, &rev, max_count, all_parents),
        Command::Lookup { rev, kind } => lookup::lookup(ctx, &rev, kind.into()),
        Command::Config => config_cmd::config(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// An opened repository plus its effective configuration.
pub(crate) struct Session {
    pub repo: Repository,
    pub config: Config,
}

impl Session {
    /// Open the repository containing the context's cwd and resolve `rev`.
    pub(crate) fn open(ctx: &Context, rev: &str) -> Result<(Self, ObjectId)> {
        let cwd = ctx.cwd()?;
        let store = GitStore::open(&cwd).context("Failed to open repository")?;
        let id = store
            .resolve_revision(rev)
            .with_context(|| format!("Failed to resolve '{rev}'"))?;
        let loaded = Config::load(Some(store.git_dir())).context("Failed to load config")?;

        output::debug(format_args!("resolved {rev} to {id}"), ctx.verbosity());

        let session = Self {
            repo: Repository::from_git_store(store),
            config: loaded.config,
        };
        Ok((session, id))
    }
}
