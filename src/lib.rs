//! jagged - a bridge from git objects to caller-side values
//!
//! jagged resolves commits and trees in a git object store and hands their
//! contents back as plain owned values. Callers hold object ids and
//! lightweight wrappers; native objects never outlive the call that
//! resolved them.
//!
//! # Architecture
//!
//! - [`bridge`] - Object lookup, commit and tree accessors, lifetime rules
//! - [`native`] - The object store seam and an in-memory store
//! - [`git`] - libgit2-backed store (single doorway to `git2`)
//! - [`core`] - Domain types and configuration
//! - [`cli`] - Command-line caller built on the bridge
//! - [`logging`] - Logger bootstrap
//! - [`ui`] - Output formatting
//!
//! # Invariants
//!
//! 1. Every native handle acquired by an operation is released before it
//!    returns, on success and on failure
//! 2. Results are copies; no caller value aliases store memory
//! 3. Failures carry the store's own message and code through unchanged
//! 4. Wrapper selection follows the object's actual kind

pub mod bridge;
pub mod cli;
pub mod core;
pub mod git;
pub mod logging;
pub mod native;
pub mod ui;
