//! bridge::tree
//!
//! Tree accessors.
//!
//! Entries are addressed by position in the store's own order (git sorts
//! by name, with sub-trees compared as `name/`). The bridge never re-sorts.
//! Since a caller's entry count may be stale by the time it asks for an
//! entry, an out-of-range position is an ordinary error, not a fault.

use serde::Serialize;

use super::error::BridgeError;
use super::object::{copy_text, resolve, tree_view, GitObjectRef, Tree};
use super::repository::Repository;
use crate::core::types::{FileMode, ObjectId, ObjectKind};

/// One entry of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub name: String,
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub mode: FileMode,
}

/// Raw code reported for an entry the store cannot classify
/// (libgit2 `GIT_OBJECT_INVALID`).
const INVALID_KIND: i32 = -1;

/// Number of entries in a tree.
///
/// # Errors
///
/// - [`BridgeError::CountOverflow`] if the count does not fit an `i64`
/// - any store failure resolving the tree
pub fn get_entry_count(repo: &Repository, tree: &dyn GitObjectRef) -> Result<i64, BridgeError> {
    let store = repo.handle()?;
    let native = resolve(&*store, tree, ObjectKind::Tree)?;
    let count = tree_view(&*native)?.entry_count();

    i64::try_from(count).map_err(|_| BridgeError::CountOverflow {
        what: "tree entries",
        count,
    })
}

/// Entry at `index`.
///
/// # Panics
///
/// Panics if `index` is negative; that is a caller bug, not a condition to
/// recover from.
///
/// # Errors
///
/// - [`BridgeError::EntryNotFound`] if `index` is past the last entry
/// - [`BridgeError::Encoding`] if the entry name is not UTF-8
/// - [`BridgeError::UnknownObjectType`] if the store cannot classify the entry
/// - any store failure resolving the tree
pub fn get_entry(
    repo: &Repository,
    tree: &dyn GitObjectRef,
    index: i64,
) -> Result<TreeEntry, BridgeError> {
    assert!(index >= 0, "tree entry index must be non-negative, got {index}");

    let store = repo.handle()?;
    let native = resolve(&*store, tree, ObjectKind::Tree)?;
    let native_tree = tree_view(&*native)?;

    let raw = usize::try_from(index)
        .ok()
        .and_then(|position| native_tree.entry(position))
        .ok_or(BridgeError::EntryNotFound { index })?;

    let name = copy_text(&raw.name, "tree entry name")?;
    let kind = raw
        .kind
        .ok_or(BridgeError::UnknownObjectType(INVALID_KIND))?;

    Ok(TreeEntry {
        name,
        id: raw.id,
        kind,
        mode: raw.mode,
    })
}

impl Tree {
    /// Number of entries. See [`get_entry_count`].
    pub fn entry_count(&self) -> Result<i64, BridgeError> {
        get_entry_count(self.repository(), self)
    }

    /// Entry at `index`. See [`get_entry`].
    pub fn entry(&self, index: i64) -> Result<TreeEntry, BridgeError> {
        get_entry(self.repository(), self, index)
    }

    /// All entries, read one bridge call at a time.
    ///
    /// Fails on the first entry that cannot be read.
    pub fn entries(&self) -> Result<Vec<TreeEntry>, BridgeError> {
        let count = self.entry_count()?;
        (0..count).map(|index| self.entry(index)).collect()
    }

    /// Find an entry by exact name.
    pub fn entry_by_name(&self, name: &str) -> Result<Option<TreeEntry>, BridgeError> {
        Ok(self.entries()?.into_iter().find(|entry| entry.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::memory::{MemoryObject, MemoryStore, MemoryTree};
    use crate::native::RawTreeEntry;
    use std::borrow::Cow;

    fn blob_id(n: u8) -> ObjectId {
        ObjectId::from_raw([n; 20])
    }

    fn three_entry_tree() -> (MemoryStore, Tree) {
        let store = MemoryStore::new();
        let id = store.insert(MemoryObject::Tree(MemoryTree::new(vec![
            MemoryTree::new_entry("src", blob_id(3), ObjectKind::Tree, FileMode::TREE),
            MemoryTree::new_entry("README.md", blob_id(1), ObjectKind::Blob, FileMode::BLOB),
            MemoryTree::new_entry("build.sh", blob_id(2), ObjectKind::Blob, FileMode::BLOB_EXECUTABLE),
        ])));
        let repo = Repository::from_store(store.clone());
        (store, Tree::new(repo, id))
    }

    mod count {
        use super::*;

        #[test]
        fn counts_entries() {
            let (store, tree) = three_entry_tree();
            assert_eq!(tree.entry_count().unwrap(), 3);
            assert!(store.handle_counts().is_balanced());
        }

        #[test]
        fn empty_tree() {
            let store = MemoryStore::new();
            let id = store.insert(MemoryObject::Tree(MemoryTree::default()));
            let tree = Tree::new(Repository::from_store(store), id);
            assert_eq!(tree.entry_count().unwrap(), 0);
            assert!(tree.entries().unwrap().is_empty());
        }
    }

    mod entry {
        use super::*;

        #[test]
        fn follows_store_order() {
            let (_, tree) = three_entry_tree();
            let names: Vec<String> = tree.entries().unwrap().into_iter().map(|e| e.name).collect();
            assert_eq!(names, vec!["README.md", "build.sh", "src"]);
        }

        #[test]
        fn copies_all_fields() {
            let (_, tree) = three_entry_tree();
            let entry = tree.entry(1).unwrap();
            assert_eq!(
                entry,
                TreeEntry {
                    name: "build.sh".to_string(),
                    id: blob_id(2),
                    kind: ObjectKind::Blob,
                    mode: FileMode::BLOB_EXECUTABLE,
                }
            );
        }

        #[test]
        fn one_past_the_end_is_not_found() {
            let (store, tree) = three_entry_tree();
            let err = tree.entry(3).unwrap_err();
            assert!(matches!(err, BridgeError::EntryNotFound { index: 3 }));
            assert!(matches!(
                tree.entry(i64::MAX).unwrap_err(),
                BridgeError::EntryNotFound { .. }
            ));
            assert!(store.handle_counts().is_balanced());
        }

        #[test]
        #[should_panic(expected = "non-negative")]
        fn negative_index_panics() {
            let (_, tree) = three_entry_tree();
            let _ = tree.entry(-1);
        }

        #[test]
        fn invalid_name_is_encoding_error() {
            let store = MemoryStore::new();
            let id = store.insert(MemoryObject::Tree(MemoryTree::new(vec![RawTreeEntry {
                name: Cow::Owned(b"bad\xff".to_vec()),
                id: blob_id(1),
                kind: Some(ObjectKind::Blob),
                mode: FileMode::BLOB,
            }])));
            let tree = Tree::new(Repository::from_store(store.clone()), id);

            let err = tree.entry(0).unwrap_err();
            assert!(matches!(
                err,
                BridgeError::Encoding {
                    field: "tree entry name"
                }
            ));
            assert!(store.handle_counts().is_balanced());
        }

        #[test]
        fn unclassified_entry_is_unknown_type() {
            let store = MemoryStore::new();
            let id = store.insert(MemoryObject::Tree(MemoryTree::new(vec![RawTreeEntry {
                name: Cow::Owned(b"odd".to_vec()),
                id: blob_id(1),
                kind: None,
                mode: FileMode::from_bits(0o100664),
            }])));
            let tree = Tree::new(Repository::from_store(store), id);

            assert!(matches!(
                tree.entry(0).unwrap_err(),
                BridgeError::UnknownObjectType(-1)
            ));
        }

        #[test]
        fn by_name() {
            let (_, tree) = three_entry_tree();
            let entry = tree.entry_by_name("src").unwrap().unwrap();
            assert_eq!(entry.kind, ObjectKind::Tree);
            assert!(tree.entry_by_name("missing").unwrap().is_none());
        }
    }

    #[test]
    fn commit_is_not_a_tree() {
        let store = MemoryStore::new();
        let tree_id = store.insert(MemoryObject::Tree(MemoryTree::default()));
        let commit_id = store.insert(MemoryObject::Commit(
            crate::native::memory::MemoryCommit::new(tree_id, vec![], "A", "a@example.com"),
        ));
        let bogus = Tree::new(Repository::from_store(store), commit_id);
        assert!(matches!(
            bogus.entry_count().unwrap_err(),
            BridgeError::TypeMismatch { .. }
        ));
    }
}
