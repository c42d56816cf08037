//! bridge::repository
//!
//! Caller-side repository reference and native handle resolution.
//!
//! A [`Repository`] owns one native store. Cloning it is cheap and every
//! clone refers to the same store, the way several caller objects share
//! one repository. Once [`Repository::dispose`] runs, the store is freed
//! and every later operation through any clone fails with
//! [`BridgeError::RepositoryDisposed`].

use std::cell::{Ref, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;

use super::error::BridgeError;
use super::object::{object_lookup, Commit, GitObject, Tree};
use crate::core::types::{ObjectId, ObjectKind};
use crate::git::{GitError, GitStore};
use crate::native::ObjectStore;

/// A repository reference.
///
/// Not `Send`: each repository is used from one thread.
#[derive(Clone)]
pub struct Repository {
    inner: Rc<RepositoryInner>,
}

struct RepositoryInner {
    path: Option<PathBuf>,
    store: RefCell<Option<Box<dyn ObjectStore>>>,
}

impl Repository {
    /// Open the git repository containing `path`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::RepositoryOpen`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, BridgeError> {
        let store = GitStore::open(path).map_err(|err| match err {
            GitError::NotARepo { path } => BridgeError::RepositoryOpen {
                message: "not a git repository".to_string(),
                path,
            },
            other => BridgeError::RepositoryOpen {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;
        Ok(Self::from_git_store(store))
    }

    /// Wrap an opened git store, keeping its git directory as the path.
    pub fn from_git_store(store: GitStore) -> Self {
        let git_dir = store.git_dir().to_path_buf();
        Self::with_path(store, Some(git_dir))
    }

    /// Wrap an already-open store.
    pub fn from_store(store: impl ObjectStore + 'static) -> Self {
        Self::with_path(store, None)
    }

    fn with_path(store: impl ObjectStore + 'static, path: Option<PathBuf>) -> Self {
        Self {
            inner: Rc::new(RepositoryInner {
                path,
                store: RefCell::new(Some(Box::new(store))),
            }),
        }
    }

    /// Location of the repository, when it was opened from disk.
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Borrow the native store for the duration of one operation.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::RepositoryDisposed`] after [`Repository::dispose`]
    pub(crate) fn handle(&self) -> Result<Ref<'_, dyn ObjectStore>, BridgeError> {
        Ref::filter_map(self.inner.store.borrow(), |store| store.as_deref())
            .map_err(|_| BridgeError::RepositoryDisposed)
    }

    /// Free the native store. Idempotent.
    pub fn dispose(&self) {
        if self.inner.store.borrow_mut().take().is_some() {
            debug!("event=repo_dispose module=bridge status=ok");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.store.borrow().is_none()
    }

    /// Whether two references share one underlying repository.
    pub fn same_repository(&self, other: &Repository) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Look up an object and wrap it by its actual kind.
    ///
    /// See [`object_lookup`].
    pub fn lookup(&self, id: &ObjectId, kind: ObjectKind) -> Result<GitObject, BridgeError> {
        object_lookup(self, id, kind)
    }

    /// Look up a commit.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::TypeMismatch`] if `id` names a different kind
    pub fn lookup_commit(&self, id: &ObjectId) -> Result<Commit, BridgeError> {
        match self.lookup(id, ObjectKind::Commit)? {
            GitObject::Commit(commit) => Ok(commit),
            other => Err(other.mismatch(ObjectKind::Commit)),
        }
    }

    /// Look up a tree.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::TypeMismatch`] if `id` names a different kind
    pub fn lookup_tree(&self, id: &ObjectId) -> Result<Tree, BridgeError> {
        match self.lookup(id, ObjectKind::Tree)? {
            GitObject::Tree(tree) => Ok(tree),
            other => Err(other.mismatch(ObjectKind::Tree)),
        }
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.inner.path)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
