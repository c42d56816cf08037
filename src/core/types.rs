//! core::types
//!
//! Strong types for git object identity.
//!
//! # Types
//!
//! - [`ObjectId`] - Fixed-width (20 byte) git object identifier
//! - [`ObjectKind`] - Object type tag with libgit2 raw codes
//! - [`FileMode`] - Tree entry file-mode bits
//!
//! # Wire forms
//!
//! An [`ObjectId`] crosses the bridge in two forms: the raw 20-byte
//! sequence (`from_bytes` / `to_bytes`) and 40 hex digits (`from_hex` /
//! `Display`). Both decoders validate width, so an invalid identifier
//! cannot be represented.
//!
//! # Examples
//!
//! ```
//! use jagged::core::types::{ObjectId, ObjectKind};
//!
//! let id = ObjectId::from_hex("abc123def4567890abc123def4567890abc12345").unwrap();
//! assert_eq!(ObjectId::from_bytes(&id.to_bytes()).unwrap(), id);
//!
//! assert!(ObjectId::from_bytes(&[0u8; 19]).is_err());
//! assert_eq!(ObjectKind::Tree.raw(), 2);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid object kind: {0}")]
    InvalidKind(String),
}

/// A git object identifier.
///
/// Always exactly [`ObjectId::RAW_LEN`] bytes. Equality and ordering are
/// byte-wise. Values are `Copy`, so an id handed to a caller never aliases
/// store memory.
///
/// # Example
///
/// ```
/// use jagged::core::types::ObjectId;
///
/// let id = ObjectId::from_hex("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(id.to_string(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(id.short(7), "abc123d");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; OID_RAW_LEN]);

const OID_RAW_LEN: usize = 20;

impl ObjectId {
    /// Width of the binary form.
    pub const RAW_LEN: usize = OID_RAW_LEN;

    /// Width of the hex form.
    pub const HEX_LEN: usize = 2 * Self::RAW_LEN;

    /// Wrap an already fixed-width byte array.
    pub const fn from_raw(raw: [u8; Self::RAW_LEN]) -> Self {
        Self(raw)
    }

    /// Decode the binary wire form.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` unless `bytes` is exactly
    /// [`ObjectId::RAW_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        let raw: [u8; Self::RAW_LEN] = bytes.try_into().map_err(|_| {
            TypeError::InvalidOid(format!(
                "expected {} bytes, got {}",
                Self::RAW_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// Decode the hex form. Upper and lower case digits are accepted.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not exactly
    /// [`ObjectId::HEX_LEN`] hex digits.
    pub fn from_hex(hex_str: &str) -> Result<Self, TypeError> {
        if hex_str.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidOid(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                hex_str.len()
            )));
        }
        let mut raw = [0u8; Self::RAW_LEN];
        hex::decode_to_slice(hex_str, &mut raw)
            .map_err(|_| TypeError::InvalidOid("object id must be hexadecimal".into()))?;
        Ok(Self(raw))
    }

    /// The zero id, used by git for "no object".
    pub const fn zero() -> Self {
        Self([0; Self::RAW_LEN])
    }

    /// Check if this is the zero id.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Borrow the binary form.
    pub fn as_bytes(&self) -> &[u8; Self::RAW_LEN] {
        &self.0
    }

    /// Encode the binary wire form into a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated hex form.
    ///
    /// Returns the first `len` hex digits, or the full id if `len` exceeds it.
    pub fn short(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.min(Self::HEX_LEN));
        hex
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&[u8]> for ObjectId {
    type Error = TypeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_hex()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

/// Object type tag.
///
/// Raw codes match libgit2's `git_object_t`, so they can be stored and
/// compared against values reported by other libgit2 bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Matches any kind; only meaningful as a lookup request.
    Any,
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectKind {
    /// libgit2 raw type code.
    pub fn raw(self) -> i32 {
        match self {
            ObjectKind::Any => -2,
            ObjectKind::Commit => 1,
            ObjectKind::Tree => 2,
            ObjectKind::Blob => 3,
            ObjectKind::Tag => 4,
        }
    }

    /// Whether an object of kind `actual` satisfies a request for `self`.
    pub fn accepts(self, actual: ObjectKind) -> bool {
        self == ObjectKind::Any || self == actual
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Any => "any",
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Tag => "tag",
        }
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(ObjectKind::Any),
            "commit" => Ok(ObjectKind::Commit),
            "tree" => Ok(ObjectKind::Tree),
            "blob" => Ok(ObjectKind::Blob),
            "tag" => Ok(ObjectKind::Tag),
            other => Err(TypeError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-mode bits of a tree entry.
///
/// Kept as the raw bits the store reports; git only writes the five
/// values below, but older trees may carry others (e.g. `100664`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMode(u32);

impl FileMode {
    pub const TREE: FileMode = FileMode(0o040000);
    pub const BLOB: FileMode = FileMode(0o100644);
    pub const BLOB_EXECUTABLE: FileMode = FileMode(0o100755);
    pub const LINK: FileMode = FileMode(0o120000);
    pub const COMMIT: FileMode = FileMode(0o160000);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn is_tree(self) -> bool {
        self.0 & 0o170000 == 0o040000
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileMode({:06o})", self.0)
    }
}
