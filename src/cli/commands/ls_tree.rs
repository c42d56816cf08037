//! ls-tree command - List tree entries in stored order

use anyhow::{Context as _, Result};

use super::Session;
use crate::bridge::GitObject;
use crate::cli::Context;
use crate::core::types::ObjectKind;
use crate::ui::output;

/// List the entries of a tree, or of a commit's root tree.
pub fn ls_tree(ctx: &Context, rev: &str, json: bool) -> Result<()> {
    let (session, id) = Session::open(ctx, rev)?;

    let tree = match session
        .repo
        .lookup(&id, ObjectKind::Any)
        .with_context(|| format!("Failed to look up '{rev}'"))?
    {
        GitObject::Tree(tree) => tree,
        GitObject::Commit(commit) => commit.tree().context("Failed to read tree")?,
    };

    let entries = tree.entries().context("Failed to read tree entries")?;

    if json {
        return output::json(&entries).context("Failed to serialize output");
    }

    let verbosity = ctx.verbosity();
    for entry in &entries {
        output::print(
            format_args!("{} {} {}\t{}", entry.mode, entry.kind, entry.id, entry.name),
            verbosity,
        );
    }

    Ok(())
}
