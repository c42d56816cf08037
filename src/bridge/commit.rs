//! bridge::commit
//!
//! Commit accessors.
//!
//! Each accessor resolves the commit independently. Nothing read by one
//! call is visible to the next, so two calls may observe different store
//! states if the store changes in between.

use log::debug;
use serde::Serialize;

use super::error::{translate, BridgeError};
use super::object::{
    commit_view, copy_text, resolve, wrap, Commit, GitObject, GitObjectRef, Tree,
};
use super::repository::Repository;
use crate::core::types::ObjectKind;
use crate::native::RawSignature;

/// Largest sequence the bridge hands back in one call. Callers may index
/// returned lists with an `i32`.
pub const MAX_SEQUENCE_LEN: usize = i32::MAX as usize;

/// A name and email pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Committer and author of one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitMetadata {
    pub committer: Signature,
    pub author: Signature,
}

fn copy_signature(
    raw: &RawSignature<'_>,
    name_field: &'static str,
    email_field: &'static str,
) -> Result<Signature, BridgeError> {
    Ok(Signature {
        name: copy_text(&raw.name, name_field)?,
        email: copy_text(&raw.email, email_field)?,
    })
}

/// Read committer and author of a commit.
///
/// All four text fields are copied before the metadata is built; any field
/// that is not valid UTF-8 fails the whole call.
///
/// # Errors
///
/// - [`BridgeError::Lookup`] / [`BridgeError::TypeMismatch`] if `commit`
///   does not resolve to a commit
/// - [`BridgeError::Encoding`] naming the first field that is not UTF-8
pub fn get_metadata(
    repo: &Repository,
    commit: &dyn GitObjectRef,
) -> Result<CommitMetadata, BridgeError> {
    let store = repo.handle()?;
    let native = resolve(&*store, commit, ObjectKind::Commit)?;
    let native_commit = commit_view(&*native)?;

    let committer = copy_signature(
        &native_commit.committer(),
        "committer name",
        "committer email",
    )?;
    let author = copy_signature(&native_commit.author(), "author name", "author email")?;

    Ok(CommitMetadata { committer, author })
}

/// Resolve a commit's parents, in stored order.
///
/// The first element is the first parent. Root commits yield an empty
/// vector.
///
/// # Errors
///
/// - [`BridgeError::CountOverflow`] if the parent count exceeds
///   [`MAX_SEQUENCE_LEN`]
/// - [`BridgeError::ResourceExhausted`] if the result cannot be allocated
/// - any store failure resolving a parent; no partial list is returned
pub fn get_parents(
    repo: &Repository,
    commit: &dyn GitObjectRef,
) -> Result<Vec<Commit>, BridgeError> {
    let store = repo.handle()?;
    let native = resolve(&*store, commit, ObjectKind::Commit)?;
    let native_commit = commit_view(&*native)?;

    let count = native_commit.parent_count();
    if count > MAX_SEQUENCE_LEN {
        return Err(BridgeError::CountOverflow {
            what: "parents",
            count,
        });
    }

    let mut parents = Vec::new();
    parents
        .try_reserve_exact(count)
        .map_err(|_| BridgeError::ResourceExhausted {
            what: "parent list",
        })?;

    for index in 0..count {
        let parent = native_commit.parent(index).map_err(translate)?;
        match wrap(repo, &*parent)? {
            GitObject::Commit(wrapped) => parents.push(wrapped),
            other => return Err(other.mismatch(ObjectKind::Commit)),
        }
    }

    debug!(
        "event=commit_parents module=bridge status=ok id={} count={count}",
        commit.id()
    );
    Ok(parents)
}

/// Resolve a commit's root tree.
///
/// # Errors
///
/// - any store failure resolving the commit or its tree
pub fn get_tree(repo: &Repository, commit: &dyn GitObjectRef) -> Result<Tree, BridgeError> {
    let store = repo.handle()?;
    let native = resolve(&*store, commit, ObjectKind::Commit)?;
    let native_commit = commit_view(&*native)?;

    let tree = native_commit.tree().map_err(translate)?;
    let object = wrap(repo, &*tree)?;
    match object {
        GitObject::Tree(tree) => Ok(tree),
        other => Err(other.mismatch(ObjectKind::Tree)),
    }
}

impl Commit {
    /// Committer and author. See [`get_metadata`].
    pub fn metadata(&self) -> Result<CommitMetadata, BridgeError> {
        get_metadata(self.repository(), self)
    }

    /// Parents in stored order. See [`get_parents`].
    pub fn parents(&self) -> Result<Vec<Commit>, BridgeError> {
        get_parents(self.repository(), self)
    }

    /// Root tree. See [`get_tree`].
    pub fn tree(&self) -> Result<Tree, BridgeError> {
        get_tree(self.repository(), self)
    }
}
