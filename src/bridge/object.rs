//! bridge::object
//!
//! Object resolution and the caller-side object wrappers.
//!
//! # Wrappers
//!
//! [`Commit`] and [`Tree`] are `(Repository, ObjectId)` pairs. They hold no
//! native handle: every accessor resolves the object again from its id,
//! reads what it needs, and releases the handle before returning. A
//! wrapper is therefore a capability to re-resolve, never a live object,
//! and it stays valid (though possibly failing) across store mutation or
//! disposal.
//!
//! # Dispatch
//!
//! [`GitObject`] is the closed set of kinds the bridge can wrap. Dispatch
//! happens on the object's *actual* kind as reported by the store, not on
//! the kind the caller asked for; adding blobs or tags means adding a
//! variant here and an arm in `wrap`.

use std::fmt;

use log::debug;

use super::error::{translate, BridgeError};
use super::repository::Repository;
use crate::core::types::{ObjectId, ObjectKind};
use crate::native::{NativeCommit, NativeHandle, NativeObject, NativeTree, ObjectStore};

/// Anything that can name an object in a repository.
pub trait GitObjectRef {
    /// The repository the object belongs to.
    fn repository(&self) -> &Repository;

    /// The object's identifier.
    fn id(&self) -> ObjectId;
}

/// A commit reference.
#[derive(Clone)]
pub struct Commit {
    repo: Repository,
    id: ObjectId,
}

/// A tree reference.
#[derive(Clone)]
pub struct Tree {
    repo: Repository,
    id: ObjectId,
}

macro_rules! object_ref {
    ($name:ident) => {
        impl $name {
            /// Reference the object at `id` without resolving it.
            ///
            /// Nothing is checked until the first accessor call.
            pub fn new(repo: Repository, id: ObjectId) -> Self {
                Self { repo, id }
            }
        }

        impl GitObjectRef for $name {
            fn repository(&self) -> &Repository {
                &self.repo
            }

            fn id(&self) -> ObjectId {
                self.id
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && self.repo.same_repository(&other.repo)
            }
        }

        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.id).finish()
            }
        }
    };
}

object_ref!(Commit);
object_ref!(Tree);

/// A wrapped object of any supported kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Commit(Commit),
    Tree(Tree),
}

impl GitObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            GitObject::Commit(_) => ObjectKind::Commit,
            GitObject::Tree(_) => ObjectKind::Tree,
        }
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            GitObject::Commit(commit) => Some(commit),
            GitObject::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            GitObject::Tree(tree) => Some(tree),
            GitObject::Commit(_) => None,
        }
    }

    /// Error for a caller that needed `expected` but got this object.
    pub(crate) fn mismatch(&self, expected: ObjectKind) -> BridgeError {
        kind_mismatch(&self.id(), expected, self.kind())
    }
}

impl GitObjectRef for GitObject {
    fn repository(&self) -> &Repository {
        match self {
            GitObject::Commit(commit) => commit.repository(),
            GitObject::Tree(tree) => tree.repository(),
        }
    }

    fn id(&self) -> ObjectId {
        match self {
            GitObject::Commit(commit) => commit.id(),
            GitObject::Tree(tree) => tree.id(),
        }
    }
}

fn kind_mismatch(id: &ObjectId, expected: ObjectKind, actual: ObjectKind) -> BridgeError {
    BridgeError::TypeMismatch {
        raw_code: None,
        message: format!("object {id} is a {actual}, expected a {expected}"),
    }
}

/// Resolve the object a caller-side reference names.
///
/// The returned handle borrows `store` and must be dropped before the
/// calling operation returns.
pub(crate) fn resolve<'s>(
    store: &'s dyn ObjectStore,
    object: &dyn GitObjectRef,
    expected: ObjectKind,
) -> Result<NativeHandle<'s>, BridgeError> {
    let id = object.id();
    let native = store.lookup(&id, expected).map_err(translate)?;
    debug!("event=object_resolve module=bridge status=ok id={id} kind={expected}");
    Ok(native)
}

/// Build the wrapper for a resolved object.
///
/// The id is copied out of the native object; the handle itself is not
/// retained.
pub(crate) fn wrap(
    repo: &Repository,
    native: &dyn NativeObject,
) -> Result<GitObject, BridgeError> {
    let id = native.id();
    match native.kind() {
        ObjectKind::Commit => Ok(GitObject::Commit(Commit::new(repo.clone(), id))),
        ObjectKind::Tree => Ok(GitObject::Tree(Tree::new(repo.clone(), id))),
        other => {
            debug!(
                "event=object_wrap module=bridge status=error id={id} kind={other} reason=unknown_type"
            );
            Err(BridgeError::UnknownObjectType(other.raw()))
        }
    }
}

/// Commit view of a handle resolved as a commit.
pub(crate) fn commit_view(native: &dyn NativeObject) -> Result<&dyn NativeCommit, BridgeError> {
    native
        .as_commit()
        .ok_or_else(|| kind_mismatch(&native.id(), ObjectKind::Commit, native.kind()))
}

/// Tree view of a handle resolved as a tree.
pub(crate) fn tree_view(native: &dyn NativeObject) -> Result<&dyn NativeTree, BridgeError> {
    native
        .as_tree()
        .ok_or_else(|| kind_mismatch(&native.id(), ObjectKind::Tree, native.kind()))
}

/// Copy store text into a caller string.
pub(crate) fn copy_text(bytes: &[u8], field: &'static str) -> Result<String, BridgeError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| BridgeError::Encoding { field })
}

/// Look up the object at `id` and wrap it according to its actual kind.
///
/// `kind` restricts the lookup (`ObjectKind::Any` accepts everything); the
/// wrapper chosen still follows what the store reports.
///
/// # Errors
///
/// - [`BridgeError::Lookup`] if the store cannot find or decode the object
/// - [`BridgeError::TypeMismatch`] if the object is not of kind `kind`
/// - [`BridgeError::UnknownObjectType`] if the object is neither a commit
///   nor a tree
pub fn object_lookup(
    repo: &Repository,
    id: &ObjectId,
    kind: ObjectKind,
) -> Result<GitObject, BridgeError> {
    let store = repo.handle()?;
    let native = store.lookup(id, kind).map_err(translate)?;
    wrap(repo, &*native)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::memory::{MemoryCommit, MemoryObject, MemoryStore, MemoryTree};

    fn fixture() -> (MemoryStore, Repository, ObjectId, ObjectId, ObjectId) {
        let store = MemoryStore::new();
        let tree = store.insert(MemoryObject::Tree(MemoryTree::default()));
        let commit = store.insert(MemoryObject::Commit(MemoryCommit::new(
            tree,
            vec![],
            "Ada",
            "ada@example.com",
        )));
        let blob = store.insert(MemoryObject::Blob(b"hello".to_vec()));
        let repo = Repository::from_store(store.clone());
        (store, repo, tree, commit, blob)
    }

    mod lookup {
        use super::*;

        #[test]
        fn dispatches_on_actual_kind() {
            let (store, repo, tree, commit, _) = fixture();

            let object = object_lookup(&repo, &commit, ObjectKind::Any).unwrap();
            assert_eq!(object.kind(), ObjectKind::Commit);
            assert_eq!(object.id(), commit);

            let object = object_lookup(&repo, &tree, ObjectKind::Any).unwrap();
            assert_eq!(object.kind(), ObjectKind::Tree);
            assert!(object.as_tree().is_some());
            assert!(object.as_commit().is_none());

            assert!(store.handle_counts().is_balanced());
        }

        #[test]
        fn wrapper_shares_repository() {
            let (_, repo, _, commit, _) = fixture();
            let object = object_lookup(&repo, &commit, ObjectKind::Commit).unwrap();
            assert!(object.repository().same_repository(&repo));
        }

        #[test]
        fn blob_has_no_wrapper() {
            let (store, repo, _, _, blob) = fixture();
            let err = object_lookup(&repo, &blob, ObjectKind::Any).unwrap_err();
            assert!(matches!(err, BridgeError::UnknownObjectType(3)));
            assert!(store.handle_counts().is_balanced());
        }

        #[test]
        fn requested_kind_is_enforced() {
            let (store, repo, tree, _, _) = fixture();
            let err = object_lookup(&repo, &tree, ObjectKind::Commit).unwrap_err();
            assert!(matches!(err, BridgeError::TypeMismatch { .. }));
            assert_eq!(store.handle_counts().acquired, 0);
        }

        #[test]
        fn missing_object() {
            let (_, repo, _, _, _) = fixture();
            let err = object_lookup(&repo, &ObjectId::zero(), ObjectKind::Any).unwrap_err();
            assert!(err.is_not_found());
        }

        #[test]
        fn lookup_commit_and_tree() {
            let (_, repo, tree, commit, _) = fixture();
            assert_eq!(repo.lookup_commit(&commit).unwrap().id(), commit);
            assert_eq!(repo.lookup_tree(&tree).unwrap().id(), tree);
            assert!(matches!(
                repo.lookup_commit(&tree).unwrap_err(),
                BridgeError::TypeMismatch { .. }
            ));
        }
    }

    mod wrappers {
        use super::*;

        #[test]
        fn equality_needs_same_repository() {
            let (store, repo, _, commit, _) = fixture();
            let other = Repository::from_store(store);

            assert_eq!(
                Commit::new(repo.clone(), commit),
                Commit::new(repo.clone(), commit)
            );
            assert_ne!(Commit::new(repo, commit), Commit::new(other, commit));
        }

        #[test]
        fn construction_does_not_resolve() {
            let (store, repo, _, _, _) = fixture();
            let _dangling = Tree::new(repo, ObjectId::zero());
            assert_eq!(store.handle_counts().acquired, 0);
        }

        #[test]
        fn debug_shows_id() {
            let (_, repo, _, commit, _) = fixture();
            let text = format!("{:?}", Commit::new(repo, commit));
            assert!(text.starts_with("Commit(ObjectId("));
        }
    }

    mod helpers {
        use super::*;

        #[test]
        fn copy_text_rejects_invalid_utf8() {
            assert_eq!(copy_text(b"caf\xc3\xa9", "name").unwrap(), "café");
            let err = copy_text(b"\xff\xfe", "author email").unwrap_err();
            assert!(matches!(
                err,
                BridgeError::Encoding {
                    field: "author email"
                }
            ));
        }
    }
}
