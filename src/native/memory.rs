//! native::memory
//!
//! In-memory object store for deterministic testing.
//!
//! # Design
//!
//! Objects live in a shared map behind `Rc<RefCell<..>>`, so a clone of the
//! store handed to a [`crate::bridge::Repository`] still sees mutations made
//! through the original. Every handle the store gives out is counted on
//! acquisition and again when it is dropped, which lets tests assert that
//! a bridge call released everything it acquired.
//!
//! # Example
//!
//! ```
//! use jagged::native::memory::{MemoryObject, MemoryStore, MemoryTree};
//! use jagged::native::ObjectStore;
//! use jagged::core::types::ObjectKind;
//!
//! let store = MemoryStore::new();
//! let tree = store.insert(MemoryObject::Tree(MemoryTree::default()));
//!
//! {
//!     let handle = store.lookup(&tree, ObjectKind::Tree).unwrap();
//!     assert_eq!(handle.kind(), ObjectKind::Tree);
//! }
//!
//! assert!(store.handle_counts().is_balanced());
//! ```

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::trace;

use super::{
    NativeCommit, NativeHandle, NativeObject, NativeTree, ObjectStore, RawSignature,
    RawTreeEntry, StoreError, StoreErrorCode, StoreResult,
};
use crate::core::types::{FileMode, ObjectId, ObjectKind};

/// A stored commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCommit {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub author: RawSignature<'static>,
    pub committer: RawSignature<'static>,
}

impl MemoryCommit {
    /// Commit whose author and committer are the same person.
    pub fn new(tree: ObjectId, parents: Vec<ObjectId>, name: &str, email: &str) -> Self {
        let signature = RawSignature::new(name.as_bytes().to_vec(), email.as_bytes().to_vec());
        Self {
            tree,
            parents,
            author: signature.clone(),
            committer: signature,
        }
    }
}

/// A stored tree. Entries are kept in git order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    entries: Vec<RawTreeEntry<'static>>,
}

impl MemoryTree {
    /// Build a tree, sorting entries the way git does: by name, with
    /// sub-trees compared as if their name ended in `/`.
    pub fn new(mut entries: Vec<RawTreeEntry<'static>>) -> Self {
        entries.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        Self { entries }
    }

    /// Convenience constructor for an entry.
    pub fn new_entry(
        name: &str,
        id: ObjectId,
        kind: ObjectKind,
        mode: FileMode,
    ) -> RawTreeEntry<'static> {
        RawTreeEntry {
            name: Cow::Owned(name.as_bytes().to_vec()),
            id,
            kind: Some(kind),
            mode,
        }
    }

    pub fn entries(&self) -> &[RawTreeEntry<'static>] {
        &self.entries
    }
}

fn sort_key(entry: &RawTreeEntry<'_>) -> Vec<u8> {
    let mut key = entry.name.to_vec();
    if entry.mode.is_tree() {
        key.push(b'/');
    }
    key
}

/// Any stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryObject {
    Commit(MemoryCommit),
    Tree(MemoryTree),
    Blob(Vec<u8>),
    Tag { target: ObjectId },
}

impl MemoryObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            MemoryObject::Commit(_) => ObjectKind::Commit,
            MemoryObject::Tree(_) => ObjectKind::Tree,
            MemoryObject::Blob(_) => ObjectKind::Blob,
            MemoryObject::Tag { .. } => ObjectKind::Tag,
        }
    }
}

/// Snapshot of handle accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleCounts {
    pub acquired: usize,
    pub released: usize,
}

impl HandleCounts {
    /// Every acquired handle has been released.
    pub fn is_balanced(&self) -> bool {
        self.acquired == self.released
    }

    pub fn outstanding(&self) -> usize {
        self.acquired.saturating_sub(self.released)
    }
}

#[derive(Debug, Default)]
struct HandleStats {
    acquired: Cell<usize>,
    released: Cell<usize>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    objects: HashMap<ObjectId, MemoryObject>,
    corrupt: HashSet<ObjectId>,
    next_id: u64,
}

/// In-memory store.
///
/// Cheap to clone; clones share objects and accounting.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
    stats: Rc<HandleStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object under a fresh, store-assigned id.
    pub fn insert(&self, object: MemoryObject) -> ObjectId {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            let mut raw = [0u8; ObjectId::RAW_LEN];
            raw[0] = 0xa0;
            raw[12..].copy_from_slice(&inner.next_id.to_be_bytes());
            ObjectId::from_raw(raw)
        };
        self.insert_at(id, object);
        id
    }

    /// Store an object under a caller-chosen id, returning what was there.
    pub fn insert_at(&self, id: ObjectId, object: MemoryObject) -> Option<MemoryObject> {
        self.inner.borrow_mut().objects.insert(id, object)
    }

    /// Remove an object.
    pub fn remove(&self, id: &ObjectId) -> Option<MemoryObject> {
        self.inner.borrow_mut().objects.remove(id)
    }

    /// Make every later lookup of `id` fail as a decode error.
    pub fn mark_corrupt(&self, id: ObjectId) {
        self.inner.borrow_mut().corrupt.insert(id);
    }

    pub fn handle_counts(&self) -> HandleCounts {
        HandleCounts {
            acquired: self.stats.acquired.get(),
            released: self.stats.released.get(),
        }
    }
}

impl ObjectStore for MemoryStore {
    fn lookup(&self, id: &ObjectId, kind: ObjectKind) -> StoreResult<NativeHandle<'_>> {
        let object = {
            let inner = self.inner.borrow();
            if inner.corrupt.contains(id) {
                return Err(StoreError::corrupt(id));
            }
            let object = inner.objects.get(id).ok_or_else(|| StoreError::not_found(id))?;
            if !kind.accepts(object.kind()) {
                return Err(StoreError::type_mismatch(id, kind, object.kind()));
            }
            object.clone()
        };

        let body = match object {
            MemoryObject::Commit(commit) => HandleBody::Commit(CommitBody {
                commit,
                store: self.clone(),
            }),
            MemoryObject::Tree(tree) => HandleBody::Tree(tree),
            other => HandleBody::Other(other.kind()),
        };

        self.stats.acquired.set(self.stats.acquired.get() + 1);
        trace!("event=handle_acquire store=memory id={id}");

        Ok(Box::new(MemoryHandle {
            id: *id,
            body,
            stats: Rc::clone(&self.stats),
        }))
    }
}

struct MemoryHandle {
    id: ObjectId,
    body: HandleBody,
    stats: Rc<HandleStats>,
}

enum HandleBody {
    Commit(CommitBody),
    Tree(MemoryTree),
    Other(ObjectKind),
}

struct CommitBody {
    commit: MemoryCommit,
    store: MemoryStore,
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        self.stats.released.set(self.stats.released.get() + 1);
        trace!("event=handle_release store=memory id={}", self.id);
    }
}

impl NativeObject for MemoryHandle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        match &self.body {
            HandleBody::Commit(_) => ObjectKind::Commit,
            HandleBody::Tree(_) => ObjectKind::Tree,
            HandleBody::Other(kind) => *kind,
        }
    }

    fn as_commit(&self) -> Option<&dyn NativeCommit> {
        match &self.body {
            HandleBody::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    fn as_tree(&self) -> Option<&dyn NativeTree> {
        match &self.body {
            HandleBody::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

impl NativeCommit for CommitBody {
    fn committer(&self) -> RawSignature<'_> {
        RawSignature::new(&*self.commit.committer.name, &*self.commit.committer.email)
    }

    fn author(&self) -> RawSignature<'_> {
        RawSignature::new(&*self.commit.author.name, &*self.commit.author.email)
    }

    fn parent_count(&self) -> usize {
        self.commit.parents.len()
    }

    fn parent(&self, index: usize) -> StoreResult<NativeHandle<'_>> {
        let id = self.commit.parents.get(index).ok_or_else(|| {
            StoreError::new(
                StoreErrorCode::NotFound,
                StoreError::RAW_NOT_FOUND,
                format!("parent {index} does not exist"),
            )
        })?;
        self.store.lookup(id, ObjectKind::Commit)
    }

    fn tree(&self) -> StoreResult<NativeHandle<'_>> {
        self.store.lookup(&self.commit.tree, ObjectKind::Tree)
    }
}

impl NativeTree for MemoryTree {
    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> Option<RawTreeEntry<'_>> {
        self.entries.get(index).map(|entry| RawTreeEntry {
            name: Cow::Borrowed(&*entry.name),
            id: entry.id,
            kind: entry.kind,
            mode: entry.mode,
        })
    }
}
