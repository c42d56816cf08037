//! git::interface
//!
//! Native object store backed by libgit2 through `git2`.
//!
//! [`GitStore`] implements the [`crate::native`] seam over a real
//! repository. Handles are `git2` objects; dropping them frees the
//! underlying `git_object`, so the bridge's scoped ownership maps directly
//! onto libgit2's free discipline.
//!
//! # Error Handling
//!
//! libgit2 failures become [`StoreError`]s with the raw libgit2 return code
//! preserved:
//! - `GIT_ENOTFOUND` is [`StoreErrorCode::NotFound`]
//! - out-of-memory class errors are [`StoreErrorCode::OutOfMemory`]
//! - odb/object/zlib/tree class errors are [`StoreErrorCode::Corrupt`]
//!
//! Repository-level failures (opening, revision parsing) are [`GitError`].
//!
//! # Example
//!
//! ```ignore
//! use jagged::git::GitStore;
//! use std::path::Path;
//!
//! let store = GitStore::open(Path::new("."))?;
//! let head = store.resolve_revision("HEAD")?;
//! println!("HEAD is at {}", head.short(7));
//! ```

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::core::types::{FileMode, ObjectId, ObjectKind};
use crate::native::{
    NativeCommit, NativeHandle, NativeObject, NativeTree, ObjectStore, RawSignature,
    RawTreeEntry, StoreError, StoreErrorCode, StoreResult,
};

/// Errors from repository-level git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Revision does not name an object.
    #[error("revision not found: {rev}")]
    RevisionNotFound {
        /// The revision that was not found
        rev: String,
    },

    /// Revision string could not be parsed.
    #[error("invalid revision '{rev}': {message}")]
    InvalidRevision {
        /// The offending revision
        rev: String,
        /// Parser message
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error for a revision lookup.
    fn from_revparse(err: git2::Error, rev: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RevisionNotFound {
                rev: rev.to_string(),
            },
            git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => {
                GitError::InvalidRevision {
                    rev: rev.to_string(),
                    message: err.message().to_string(),
                }
            }
            _ => GitError::Internal {
                message: format!("{}: {}", rev, err.message()),
            },
        }
    }
}

/// Translate a libgit2 failure into a store error.
pub(crate) fn store_error(err: git2::Error) -> StoreError {
    let code = match (err.code(), err.class()) {
        (git2::ErrorCode::NotFound, _) => StoreErrorCode::NotFound,
        (_, git2::ErrorClass::NoMemory) => StoreErrorCode::OutOfMemory,
        (
            _,
            git2::ErrorClass::Odb
            | git2::ErrorClass::Object
            | git2::ErrorClass::Zlib
            | git2::ErrorClass::Tree,
        ) => StoreErrorCode::Corrupt,
        _ => StoreErrorCode::Other,
    };
    StoreError::new(code, err.raw_code(), err.message())
}

/// Copy a libgit2 id out of native memory.
///
/// `git2` is built without SHA-256 support, so ids are always 20 bytes.
fn object_id(oid: git2::Oid) -> ObjectId {
    let bytes = oid.as_bytes();
    debug_assert_eq!(bytes.len(), ObjectId::RAW_LEN);
    let mut raw = [0u8; ObjectId::RAW_LEN];
    let len = bytes.len().min(ObjectId::RAW_LEN);
    raw[..len].copy_from_slice(&bytes[..len]);
    ObjectId::from_raw(raw)
}

fn git_oid(id: &ObjectId) -> StoreResult<git2::Oid> {
    git2::Oid::from_bytes(id.as_bytes()).map_err(store_error)
}

fn object_kind(kind: git2::ObjectType) -> ObjectKind {
    match kind {
        git2::ObjectType::Any => ObjectKind::Any,
        git2::ObjectType::Commit => ObjectKind::Commit,
        git2::ObjectType::Tree => ObjectKind::Tree,
        git2::ObjectType::Blob => ObjectKind::Blob,
        git2::ObjectType::Tag => ObjectKind::Tag,
    }
}

/// The git2-backed object store.
///
/// This is the only place the crate touches `git2`.
pub struct GitStore {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for GitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitStore")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl GitStore {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// inside the repository. Bare repositories are accepted; the bridge
    /// only reads objects.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        debug!(
            "event=repo_open module=git status=ok git_dir={}",
            repo.path().display()
        );
        Ok(Self { repo })
    }

    /// Path to the .git directory (or the repository itself when bare).
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Resolve a revision string (`HEAD`, a branch, a hex prefix, `HEAD~2`,
    /// `HEAD^{tree}`, ...) to an object id.
    ///
    /// Annotated tags are peeled to the object they point at, since the
    /// bridge does not model tag objects.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if nothing matches
    /// - [`GitError::InvalidRevision`] if the string is malformed or ambiguous
    pub fn resolve_revision(&self, rev: &str) -> Result<ObjectId, GitError> {
        let mut object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| GitError::from_revparse(e, rev))?;

        while object.kind() == Some(git2::ObjectType::Tag) {
            object = object
                .peel(git2::ObjectType::Any)
                .map_err(|e| GitError::from_revparse(e, rev))?;
        }

        Ok(object_id(object.id()))
    }
}

impl ObjectStore for GitStore {
    fn lookup(&self, id: &ObjectId, kind: ObjectKind) -> StoreResult<NativeHandle<'_>> {
        let oid = git_oid(id)?;
        let object = self.repo.find_object(oid, None).map_err(store_error)?;
        let actual = object
            .kind()
            .map(object_kind)
            .ok_or_else(|| StoreError::corrupt(id))?;

        if !kind.accepts(actual) {
            // `object` is freed here, before the mismatch is reported.
            return Err(StoreError::type_mismatch(id, kind, actual));
        }

        Ok(Box::new(GitHandle {
            object,
            kind: actual,
        }))
    }
}

/// A looked-up libgit2 object and its resolved kind.
struct GitHandle<'r> {
    object: git2::Object<'r>,
    kind: ObjectKind,
}

impl<'r> GitHandle<'r> {
    fn boxed(object: git2::Object<'r>, kind: ObjectKind) -> NativeHandle<'r> {
        Box::new(GitHandle { object, kind })
    }
}

impl NativeObject for GitHandle<'_> {
    fn id(&self) -> ObjectId {
        object_id(self.object.id())
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn as_commit(&self) -> Option<&dyn NativeCommit> {
        self.object
            .as_commit()
            .map(|commit| commit as &dyn NativeCommit)
    }

    fn as_tree(&self) -> Option<&dyn NativeTree> {
        self.object.as_tree().map(|tree| tree as &dyn NativeTree)
    }
}

fn raw_signature(signature: &git2::Signature<'_>) -> RawSignature<'static> {
    RawSignature::new(
        signature.name_bytes().to_vec(),
        signature.email_bytes().to_vec(),
    )
}

impl NativeCommit for git2::Commit<'_> {
    fn committer(&self) -> RawSignature<'_> {
        raw_signature(&git2::Commit::committer(self))
    }

    fn author(&self) -> RawSignature<'_> {
        raw_signature(&git2::Commit::author(self))
    }

    fn parent_count(&self) -> usize {
        git2::Commit::parent_count(self)
    }

    fn parent(&self, index: usize) -> StoreResult<NativeHandle<'_>> {
        let parent = git2::Commit::parent(self, index).map_err(store_error)?;
        Ok(GitHandle::boxed(parent.into_object(), ObjectKind::Commit))
    }

    fn tree(&self) -> StoreResult<NativeHandle<'_>> {
        let tree = git2::Commit::tree(self).map_err(store_error)?;
        Ok(GitHandle::boxed(tree.into_object(), ObjectKind::Tree))
    }
}

impl NativeTree for git2::Tree<'_> {
    fn entry_count(&self) -> usize {
        git2::Tree::len(self)
    }

    fn entry(&self, index: usize) -> Option<RawTreeEntry<'_>> {
        git2::Tree::get(self, index).map(|entry| RawTreeEntry {
            name: Cow::Owned(entry.name_bytes().to_vec()),
            id: object_id(entry.id()),
            kind: entry.kind().map(object_kind),
            mode: FileMode::from_bits(u32::try_from(entry.filemode()).unwrap_or_default()),
        })
    }
}
