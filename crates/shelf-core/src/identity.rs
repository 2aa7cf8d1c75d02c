//! # Ledger Identity Newtypes
//!
//! Newtype wrappers for the identifiers the ledger keys on. These prevent
//! accidental identifier confusion: a `Principal` cannot be passed where an
//! `ItemId` is expected.
//!
//! ## Item Identifiers
//!
//! An [`ItemId`] is derived deterministically from the item's name and author
//! and compares as the structured pair `(name, author)`. Raw concatenation of
//! the two strings is ambiguous (`("Foo", "Bar")` and `("Fo", "oBar")` both
//! concatenate to `"FooBar"`); the pair is not.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a caller, supplied by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap an authenticated identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the underlying identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog identifier of an item: the composite key `(name, author)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId {
    name: String,
    author: String,
}

impl ItemId {
    /// Derive the identifier for an item with the given name and author.
    ///
    /// Derivation performs no validation; empty components are rejected by
    /// catalog admission, not here.
    pub fn derive(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
        }
    }

    /// The item's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The item's author.
    pub fn author(&self) -> &str {
        &self.author
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} by {:?}", self.name, self.author)
    }
}

/// Unique identifier of a single loan record in the history ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub Uuid);

impl LoanId {
    /// Generate a new random loan identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "loan:{}", self.0)
    }
}
