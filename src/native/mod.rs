//! native
//!
//! The seam between the bridge and a native object store.
//!
//! # Ownership
//!
//! A lookup hands back a boxed [`NativeObject`] borrowed from the store.
//! Dropping the box is the release; there is no separate free call, so a
//! handle cannot be released twice and cannot outlive the store borrow it
//! came from.
//!
//! # Implementations
//!
//! - [`crate::git::GitStore`] - libgit2 via `git2`
//! - [`memory::MemoryStore`] - in-memory store with handle accounting

pub mod memory;

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::core::types::{FileMode, ObjectId, ObjectKind};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed native handle borrowed for `'a`.
pub type NativeHandle<'a> = Box<dyn NativeObject + 'a>;

/// Failure category reported by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// No object exists at the identifier.
    NotFound,
    /// The object exists but is not of the requested kind.
    TypeMismatch,
    /// The object could not be read or decoded.
    Corrupt,
    /// The store ran out of memory.
    OutOfMemory,
    /// Anything else.
    Other,
}

impl StoreErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreErrorCode::NotFound => "not-found",
            StoreErrorCode::TypeMismatch => "type-mismatch",
            StoreErrorCode::Corrupt => "corrupt",
            StoreErrorCode::OutOfMemory => "out-of-memory",
            StoreErrorCode::Other => "other",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported by a store.
///
/// `raw_code` is the store's own numeric code (libgit2 return value for
/// the git store), surfaced to callers unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub raw_code: i32,
    pub message: String,
}

impl StoreError {
    /// libgit2 `GIT_ERROR`.
    pub const RAW_GENERIC: i32 = -1;
    /// libgit2 `GIT_ENOTFOUND`.
    pub const RAW_NOT_FOUND: i32 = -3;

    pub fn new(code: StoreErrorCode, raw_code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            raw_code,
            message: message.into(),
        }
    }

    pub fn not_found(id: &ObjectId) -> Self {
        Self::new(
            StoreErrorCode::NotFound,
            Self::RAW_NOT_FOUND,
            format!("object not found - no match for id ({id})"),
        )
    }

    pub fn type_mismatch(id: &ObjectId, expected: ObjectKind, actual: ObjectKind) -> Self {
        Self::new(
            StoreErrorCode::TypeMismatch,
            Self::RAW_NOT_FOUND,
            format!("the requested type ({expected}) does not match the type in the store ({actual}) for {id}"),
        )
    }

    pub fn corrupt(id: &ObjectId) -> Self {
        Self::new(
            StoreErrorCode::Corrupt,
            Self::RAW_GENERIC,
            format!("failed to decode object {id}"),
        )
    }
}

/// Signature fields as stored: raw bytes, not yet validated as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature<'a> {
    pub name: Cow<'a, [u8]>,
    pub email: Cow<'a, [u8]>,
}

impl<'a> RawSignature<'a> {
    pub fn new(name: impl Into<Cow<'a, [u8]>>, email: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One tree entry as stored.
///
/// `kind` is `None` when the store cannot classify the entry; the raw
/// mode is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTreeEntry<'a> {
    pub name: Cow<'a, [u8]>,
    pub id: ObjectId,
    pub kind: Option<ObjectKind>,
    pub mode: FileMode,
}

/// A native object store.
pub trait ObjectStore {
    /// Look up the object at `id`, requiring it to be of kind `kind`
    /// (`ObjectKind::Any` accepts every kind).
    ///
    /// Implementations must never return an object whose `kind()` is not
    /// accepted by `kind`; a mismatch is `StoreErrorCode::TypeMismatch`.
    fn lookup(&self, id: &ObjectId, kind: ObjectKind) -> StoreResult<NativeHandle<'_>>;
}

/// A resolved, type-tagged native object.
pub trait NativeObject {
    /// Identifier, copied out of the object.
    fn id(&self) -> ObjectId;

    /// Actual stored kind.
    fn kind(&self) -> ObjectKind;

    /// Commit view, present iff `kind()` is `Commit`.
    fn as_commit(&self) -> Option<&dyn NativeCommit>;

    /// Tree view, present iff `kind()` is `Tree`.
    fn as_tree(&self) -> Option<&dyn NativeTree>;
}

/// Commit readers.
pub trait NativeCommit {
    fn committer(&self) -> RawSignature<'_>;

    fn author(&self) -> RawSignature<'_>;

    fn parent_count(&self) -> usize;

    /// Resolve parent `index` in stored order. The returned handle is a
    /// fresh acquisition and must be dropped by the caller.
    fn parent(&self, index: usize) -> StoreResult<NativeHandle<'_>>;

    /// Resolve the commit's root tree. Fresh acquisition, like `parent`.
    fn tree(&self) -> StoreResult<NativeHandle<'_>>;
}

/// Tree readers.
pub trait NativeTree {
    fn entry_count(&self) -> usize;

    /// Entry at `index` in the store's stable order, or `None` when out of
    /// range.
    fn entry(&self, index: usize) -> Option<RawTreeEntry<'_>>;
}
