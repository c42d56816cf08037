//! lookup command - Resolve an object and report its wrapper kind

use anyhow::{Context as _, Result};

use super::Session;
use crate::bridge::GitObjectRef;
use crate::cli::Context;
use crate::core::types::ObjectKind;
use crate::ui::output;

/// Look up `rev`, requiring `kind`, and print the wrapper chosen.
pub fn lookup(ctx: &Context, rev: &str, kind: ObjectKind) -> Result<()> {
    let (session, id) = Session::open(ctx, rev)?;
    let object = session
        .repo
        .lookup(&id, kind)
        .with_context(|| format!("Failed to look up '{rev}'"))?;

    output::print(
        format_args!("{} {}", object.kind(), object.id()),
        ctx.verbosity(),
    );
    Ok(())
}
