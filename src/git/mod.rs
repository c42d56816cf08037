//! git
//!
//! libgit2-backed native object store.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to libgit2. No other module imports
//! `git2`; the bridge talks to it exclusively through the
//! [`crate::native::ObjectStore`] seam.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Object lookup with kind checking
//! - Commit and tree readers over `git2` objects
//! - Revision parsing for callers that start from a name instead of an id
//!
//! # Invariants
//!
//! - Every `git2` object handed out is owned by a boxed handle and freed
//!   when that handle drops
//! - A lookup never returns an object whose kind differs from the request
//! - Ids are copied out of libgit2 memory before they leave this module

mod interface;

pub use interface::{GitError, GitStore};
