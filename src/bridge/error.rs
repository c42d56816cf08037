//! bridge::error
//!
//! The single error channel of the bridge.
//!
//! Every bridge operation returns `Result<_, BridgeError>`. Store failures
//! keep their store code and raw libgit2 code so callers can tell a miss
//! from corruption; bridge-internal failures (bad encoding, overflow,
//! out-of-range index) carry their own variant.

use std::path::PathBuf;

use log::debug;
use thiserror::Error;

use crate::core::types::TypeError;
use crate::native::{StoreError, StoreErrorCode};

/// Errors from bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The repository's native store was released.
    #[error("repository has been disposed")]
    RepositoryDisposed,

    /// The repository could not be opened.
    #[error("failed to open repository at {path}: {message}")]
    RepositoryOpen {
        /// The path that was searched
        path: PathBuf,
        /// Why opening failed
        message: String,
    },

    /// The store could not find or decode an object.
    #[error("{message}")]
    Lookup {
        /// Store failure category
        code: StoreErrorCode,
        /// Raw store return code
        raw_code: i32,
        /// Store-provided message, verbatim
        message: String,
    },

    /// An object exists but is not of the expected kind.
    #[error("{message}")]
    TypeMismatch {
        /// Raw store return code, when the store detected the mismatch
        raw_code: Option<i32>,
        /// Description of the mismatch
        message: String,
    },

    /// No wrapper exists for the object's kind.
    #[error("unknown object type: {0}")]
    UnknownObjectType(i32),

    /// An identifier did not have the fixed hash width.
    #[error("malformed object id: {0}")]
    MalformedIdentifier(String),

    /// Text read from the store is not valid UTF-8.
    #[error("{field} is not valid UTF-8")]
    Encoding {
        /// Which field failed, e.g. "author email"
        field: &'static str,
    },

    /// A native count does not fit the caller's integer type.
    #[error("too many {what}: {count}")]
    CountOverflow {
        /// What was being counted
        what: &'static str,
        /// The native count
        count: usize,
    },

    /// No tree entry at the requested position.
    #[error("could not locate tree entry {index}")]
    EntryNotFound {
        /// The requested position
        index: i64,
    },

    /// A result value could not be allocated.
    #[error("failed to allocate {what}")]
    ResourceExhausted {
        /// What was being allocated
        what: &'static str,
    },
}

impl BridgeError {
    /// Store failure category, for failures that originated in the store.
    pub fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            BridgeError::Lookup { code, .. } => Some(*code),
            BridgeError::TypeMismatch {
                raw_code: Some(_), ..
            } => Some(StoreErrorCode::TypeMismatch),
            _ => None,
        }
    }

    /// Raw store return code, for failures that originated in the store.
    pub fn raw_code(&self) -> Option<i32> {
        match self {
            BridgeError::Lookup { raw_code, .. } => Some(*raw_code),
            BridgeError::TypeMismatch { raw_code, .. } => *raw_code,
            _ => None,
        }
    }

    /// Check if this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        self.store_code() == Some(StoreErrorCode::NotFound)
    }
}

impl From<StoreError> for BridgeError {
    fn from(err: StoreError) -> Self {
        match err.code {
            StoreErrorCode::TypeMismatch => BridgeError::TypeMismatch {
                raw_code: Some(err.raw_code),
                message: err.message,
            },
            StoreErrorCode::OutOfMemory => BridgeError::ResourceExhausted {
                what: "native object",
            },
            code => BridgeError::Lookup {
                code,
                raw_code: err.raw_code,
                message: err.message,
            },
        }
    }
}

impl From<TypeError> for BridgeError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => BridgeError::MalformedIdentifier(msg),
            TypeError::InvalidKind(msg) => BridgeError::TypeMismatch {
                raw_code: None,
                message: format!("invalid object kind: {msg}"),
            },
        }
    }
}

/// Translate a store failure, logging it on the way through.
pub(crate) fn translate(err: StoreError) -> BridgeError {
    debug!(
        "event=store_error module=bridge code={} raw_code={} message={}",
        err.code, err.raw_code, err.message
    );
    err.into()
}
