//! show command - Display one commit through the bridge

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::Session;
use crate::bridge::{GitObjectRef, Signature};
use crate::cli::Context;
use crate::core::types::ObjectId;
use crate::ui::output;

#[derive(Debug, Serialize)]
struct ShowOutput {
    id: ObjectId,
    tree: ObjectId,
    parents: Vec<ObjectId>,
    author: Signature,
    committer: Signature,
}

/// Show a commit's tree, parents and signatures.
pub fn show(ctx: &Context, rev: &str, json: bool) -> Result<()> {
    let (session, id) = Session::open(ctx, rev)?;
    let commit = session
        .repo
        .lookup_commit(&id)
        .with_context(|| format!("'{rev}' is not a commit"))?;

    let metadata = commit.metadata().context("Failed to read commit metadata")?;
    let parents = commit.parents().context("Failed to read parents")?;
    let tree = commit.tree().context("Failed to read tree")?;

    let shown = ShowOutput {
        id,
        tree: tree.id(),
        parents: parents.iter().map(|p| p.id()).collect(),
        author: metadata.author,
        committer: metadata.committer,
    };

    if json {
        return output::json(&shown).context("Failed to serialize output");
    }

    let verbosity = ctx.verbosity();
    output::print(format_args!("commit {}", shown.id), verbosity);
    output::print(format_args!("tree {}", shown.tree), verbosity);
    if !shown.parents.is_empty() {
        output::print(output::format_list(&shown.parents, "parent "), verbosity);
    }
    output::print(format_args!("author {}", shown.author), verbosity);
    output::print(format_args!("committer {}", shown.committer), verbosity);

    Ok(())
}
