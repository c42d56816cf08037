//! Handle accounting across every bridge operation.
//!
//! The in-memory store counts acquisitions and releases; after each call,
//! successful or not, the two must match.

use std::borrow::Cow;

use jagged::bridge::{
    get_entry, get_entry_count, get_metadata, get_parents, get_tree, object_lookup, BridgeError,
    Commit, GitObjectRef, Repository, Tree,
};
use jagged::core::types::{FileMode, ObjectId, ObjectKind};
use jagged::native::memory::{MemoryCommit, MemoryObject, MemoryStore, MemoryTree};
use jagged::native::{RawSignature, RawTreeEntry};

struct Fixture {
    store: MemoryStore,
    repo: Repository,
    tree: ObjectId,
    root: ObjectId,
    merge: ObjectId,
    blob: ObjectId,
}

impl Fixture {
    fn new() -> Self {
        let store = MemoryStore::new();
        let blob = store.insert(MemoryObject::Blob(b"data".to_vec()));
        let tree = store.insert(MemoryObject::Tree(MemoryTree::new(vec![
            MemoryTree::new_entry("data.bin", blob, ObjectKind::Blob, FileMode::BLOB),
            MemoryTree::new_entry("docs", blob, ObjectKind::Tree, FileMode::TREE),
        ])));
        let root = store.insert(MemoryObject::Commit(MemoryCommit::new(
            tree,
            vec![],
            "Root",
            "root@example.com",
        )));
        let side = store.insert(MemoryObject::Commit(MemoryCommit::new(
            tree,
            vec![root],
            "Side",
            "side@example.com",
        )));
        let merge = store.insert(MemoryObject::Commit(MemoryCommit::new(
            tree,
            vec![root, side],
            "Merge",
            "merge@example.com",
        )));
        let repo = Repository::from_store(store.clone());
        Self {
            store,
            repo,
            tree,
            root,
            merge,
            blob,
        }
    }

    fn commit(&self, id: ObjectId) -> Commit {
        Commit::new(self.repo.clone(), id)
    }

    fn tree(&self, id: ObjectId) -> Tree {
        Tree::new(self.repo.clone(), id)
    }

    fn assert_balanced(&self) {
        let counts = self.store.handle_counts();
        assert!(
            counts.is_balanced(),
            "leaked {} handle(s): {counts:?}",
            counts.outstanding()
        );
    }
}

mod success_paths {
    use super::*;

    #[test]
    fn every_operation_releases() {
        let fx = Fixture::new();

        object_lookup(&fx.repo, &fx.merge, ObjectKind::Any).unwrap();
        get_metadata(&fx.repo, &fx.commit(fx.merge)).unwrap();
        get_parents(&fx.repo, &fx.commit(fx.merge)).unwrap();
        get_tree(&fx.repo, &fx.commit(fx.merge)).unwrap();
        get_entry_count(&fx.repo, &fx.tree(fx.tree)).unwrap();
        get_entry(&fx.repo, &fx.tree(fx.tree), 1).unwrap();

        let counts = fx.store.handle_counts();
        assert!(counts.acquired > 0);
        fx.assert_balanced();
    }

    #[test]
    fn parents_acquire_one_handle_each() {
        let fx = Fixture::new();
        get_parents(&fx.repo, &fx.commit(fx.merge)).unwrap();
        // the commit itself plus two parents
        assert_eq!(fx.store.handle_counts().acquired, 3);
        fx.assert_balanced();
    }
}

mod failure_paths {
    use super::*;

    #[test]
    fn missing_object() {
        let fx = Fixture::new();
        let missing = ObjectId::from_raw([0x42; 20]);
        assert!(object_lookup(&fx.repo, &missing, ObjectKind::Any)
            .unwrap_err()
            .is_not_found());
        fx.assert_balanced();
    }

    #[test]
    fn unknown_object_type_after_resolution() {
        let fx = Fixture::new();
        let err = object_lookup(&fx.repo, &fx.blob, ObjectKind::Any).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownObjectType(3)));
        // the blob was resolved, then released
        assert_eq!(fx.store.handle_counts().acquired, 1);
        fx.assert_balanced();
    }

    #[test]
    fn corrupt_parent_midway() {
        let fx = Fixture::new();
        let parents = fx.repo.lookup_commit(&fx.merge).unwrap().parents().unwrap();
        let side = parents[1].id();
        fx.store.mark_corrupt(side);

        let err = get_parents(&fx.repo, &fx.commit(fx.merge)).unwrap_err();
        assert!(matches!(err, BridgeError::Lookup { .. }));
        fx.assert_balanced();
    }

    #[test]
    fn entry_out_of_range() {
        let fx = Fixture::new();
        let err = get_entry(&fx.repo, &fx.tree(fx.tree), 2).unwrap_err();
        assert!(matches!(err, BridgeError::EntryNotFound { index: 2 }));
        fx.assert_balanced();
    }

    #[test]
    fn wrong_kind_everywhere() {
        let fx = Fixture::new();
        assert!(get_metadata(&fx.repo, &fx.commit(fx.tree)).is_err());
        assert!(get_parents(&fx.repo, &fx.commit(fx.tree)).is_err());
        assert!(get_tree(&fx.repo, &fx.commit(fx.tree)).is_err());
        assert!(get_entry_count(&fx.repo, &fx.tree(fx.root)).is_err());
        assert!(get_entry(&fx.repo, &fx.tree(fx.root), 0).is_err());
        fx.assert_balanced();
    }
}

mod metadata_atomicity {
    use super::*;

    #[test]
    fn invalid_author_email_fails_whole_call() {
        let fx = Fixture::new();
        let mut raw = MemoryCommit::new(fx.tree, vec![], "Good Name", "good@example.com");
        raw.author = RawSignature::new(b"Author".to_vec(), b"bad\xffemail".to_vec());
        let id = fx.store.insert(MemoryObject::Commit(raw));

        let err = get_metadata(&fx.repo, &fx.commit(id)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Encoding {
                field: "author email"
            }
        ));
        assert_eq!(err.to_string(), "author email is not valid UTF-8");
        fx.assert_balanced();
    }

    #[test]
    fn invalid_entry_name_fails_entry() {
        let fx = Fixture::new();
        let tree = fx
            .store
            .insert(MemoryObject::Tree(MemoryTree::new(vec![RawTreeEntry {
                name: Cow::Owned(vec![0xfe, 0xff]),
                id: fx.blob,
                kind: Some(ObjectKind::Blob),
                mode: FileMode::BLOB,
            }])));

        assert_eq!(get_entry_count(&fx.repo, &fx.tree(tree)).unwrap(), 1);
        assert!(matches!(
            get_entry(&fx.repo, &fx.tree(tree), 0).unwrap_err(),
            BridgeError::Encoding { .. }
        ));
        fx.assert_balanced();
    }
}

mod no_caching {
    use super::*;

    #[test]
    fn replaced_commit_is_reread() {
        let fx = Fixture::new();
        let commit = fx.commit(fx.root);
        assert_eq!(commit.tree().unwrap().id(), fx.tree);

        let other_tree = fx.store.insert(MemoryObject::Tree(MemoryTree::default()));
        fx.store.insert_at(
            fx.root,
            MemoryObject::Commit(MemoryCommit::new(other_tree, vec![], "Root", "root@example.com")),
        );

        assert_eq!(commit.tree().unwrap().id(), other_tree);
        fx.assert_balanced();
    }

    #[test]
    fn removed_object_fails_existing_wrapper() {
        let fx = Fixture::new();
        let tree = fx.repo.lookup_tree(&fx.tree).unwrap();
        assert_eq!(tree.entry_count().unwrap(), 2);

        fx.store.remove(&fx.tree);
        assert!(tree.entry_count().unwrap_err().is_not_found());
        fx.assert_balanced();
    }
}

mod count_overflow {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use jagged::native::{
        NativeCommit, NativeHandle, NativeObject, NativeTree, ObjectStore, StoreError, StoreResult,
    };

    /// One commit and one tree, both reporting `usize::MAX` children.
    struct HugeStore {
        live: Rc<Cell<usize>>,
        commit: ObjectId,
        tree: ObjectId,
    }

    struct HugeObject {
        id: ObjectId,
        kind: ObjectKind,
        live: Rc<Cell<usize>>,
    }

    impl Drop for HugeObject {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl ObjectStore for HugeStore {
        fn lookup(&self, id: &ObjectId, kind: ObjectKind) -> StoreResult<NativeHandle<'_>> {
            let actual = if *id == self.commit {
                ObjectKind::Commit
            } else if *id == self.tree {
                ObjectKind::Tree
            } else {
                return Err(StoreError::not_found(id));
            };
            if !kind.accepts(actual) {
                return Err(StoreError::type_mismatch(id, kind, actual));
            }
            self.live.set(self.live.get() + 1);
            Ok(Box::new(HugeObject {
                id: *id,
                kind: actual,
                live: Rc::clone(&self.live),
            }))
        }
    }

    impl NativeObject for HugeObject {
        fn id(&self) -> ObjectId {
            self.id
        }

        fn kind(&self) -> ObjectKind {
            self.kind
        }

        fn as_commit(&self) -> Option<&dyn NativeCommit> {
            (self.kind == ObjectKind::Commit).then_some(self as &dyn NativeCommit)
        }

        fn as_tree(&self) -> Option<&dyn NativeTree> {
            (self.kind == ObjectKind::Tree).then_some(self as &dyn NativeTree)
        }
    }

    impl NativeCommit for HugeObject {
        fn committer(&self) -> RawSignature<'_> {
            RawSignature::new(&b"Huge"[..], &b"huge@example.com"[..])
        }

        fn author(&self) -> RawSignature<'_> {
            RawSignature::new(&b"Huge"[..], &b"huge@example.com"[..])
        }

        fn parent_count(&self) -> usize {
            usize::MAX
        }

        fn parent(&self, _index: usize) -> StoreResult<NativeHandle<'_>> {
            Err(StoreError::corrupt(&self.id))
        }

        fn tree(&self) -> StoreResult<NativeHandle<'_>> {
            Err(StoreError::not_found(&self.id))
        }
    }

    impl NativeTree for HugeObject {
        fn entry_count(&self) -> usize {
            usize::MAX
        }

        fn entry(&self, _index: usize) -> Option<RawTreeEntry<'_>> {
            None
        }
    }

    fn huge() -> (Repository, Rc<Cell<usize>>, ObjectId, ObjectId) {
        let live = Rc::new(Cell::new(0));
        let commit = ObjectId::from_raw([0xc0; 20]);
        let tree = ObjectId::from_raw([0x7e; 20]);
        let repo = Repository::from_store(HugeStore {
            live: Rc::clone(&live),
            commit,
            tree,
        });
        (repo, live, commit, tree)
    }

    #[test]
    fn parent_count_past_limit() {
        let (repo, live, commit, _) = huge();
        let err = get_parents(&repo, &Commit::new(repo.clone(), commit)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::CountOverflow {
                what: "parents",
                count: usize::MAX
            }
        ));
        assert_eq!(live.get(), 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn entry_count_past_i64() {
        let (repo, live, _, tree) = huge();
        let err = get_entry_count(&repo, &Tree::new(repo.clone(), tree)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::CountOverflow {
                what: "tree entries",
                count: usize::MAX
            }
        ));
        assert_eq!(live.get(), 0);
    }
}
