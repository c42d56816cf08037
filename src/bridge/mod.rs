//! bridge
//!
//! Translation between native store objects and caller-side values.
//!
//! # Shape of an operation
//!
//! Every operation takes a [`Repository`] and, where relevant, a caller-side
//! object reference. It then:
//!
//! 1. borrows the repository's store (failing if disposed)
//! 2. resolves the referenced object to a native handle
//! 3. copies what it needs into owned caller values
//! 4. drops every handle it acquired, on success and on failure
//!
//! Nothing native outlives the call. Callers hold only ids, strings and
//! wrappers that can re-resolve.
//!
//! # Modules
//!
//! - [`repository`] - repository reference and disposal
//! - [`object`] - object lookup and the [`Commit`] / [`Tree`] wrappers
//! - [`commit`] - metadata, parents and root tree of a commit
//! - [`tree`] - tree entry count and positional access
//! - [`error`] - [`BridgeError`]

pub mod commit;
pub mod error;
pub mod object;
pub mod repository;
pub mod tree;

pub use commit::{get_metadata, get_parents, get_tree, CommitMetadata, Signature, MAX_SEQUENCE_LEN};
pub use error::BridgeError;
pub use object::{object_lookup, Commit, GitObject, GitObjectRef, Tree};
pub use repository::Repository;
pub use tree::{get_entry, get_entry_count, TreeEntry};
