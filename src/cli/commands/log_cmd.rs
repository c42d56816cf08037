//! log command - Walk history by repeated parent lookups
//!
//! Every step is a bridge call: `parents()` on the current commit, then
//! `metadata()` on each commit shown. Nothing is cached between steps.

use std::collections::{HashSet, VecDeque};

use anyhow::{Context as _, Result};

use super::Session;
use crate::bridge::{BridgeError, Commit, GitObjectRef};
use crate::cli::Context;
use crate::core::types::ObjectId;
use crate::ui::output;

/// Collect up to `limit` commits reachable from `start`.
///
/// With `first_parent` the walk follows only the first parent. Otherwise it
/// is breadth-first over all parents in stored order, visiting each commit
/// once.
pub fn walk(start: Commit, limit: usize, first_parent: bool) -> Result<Vec<Commit>, BridgeError> {
    let mut seen: HashSet<ObjectId> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut visited = Vec::new();

    seen.insert(start.id());
    queue.push_back(start);

    while let Some(commit) = queue.pop_front() {
        if visited.len() >= limit {
            break;
        }

        let parents = commit.parents()?;
        let next: Vec<Commit> = if first_parent {
            parents.into_iter().take(1).collect()
        } else {
            parents
        };
        for parent in next {
            if seen.insert(parent.id()) {
                queue.push_back(parent);
            }
        }

        visited.push(commit);
    }

    Ok(visited)
}

/// Print one line per commit: abbreviated id and author.
pub fn log(ctx: &Context, rev: &str, max_count: Option<usize>, all_parents: bool) -> Result<()> {
    let (session, id) = Session::open(ctx, rev)?;
    let start = session
        .repo
        .lookup_commit(&id)
        .with_context(|| format!("'{rev}' is not a commit"))?;

    let limit = max_count.unwrap_or_else(|| session.config.max_count());
    let first_parent = session.config.first_parent() && !all_parents;
    let abbrev = session.config.abbrev();

    let commits = walk(start, limit, first_parent).context("Failed to walk history")?;

    let verbosity = ctx.verbosity();
    for commit in &commits {
        let metadata = commit
            .metadata()
            .with_context(|| format!("Failed to read commit {}", commit.id()))?;
        output::print(
            format_args!("{} {}", commit.id().short(abbrev), metadata.author),
            verbosity,
        );
    }

    Ok(())
}
