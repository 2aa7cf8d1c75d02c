//! # Error Types — Ledger Error Taxonomy
//!
//! Defines the single error type returned by every ledger operation. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every variant carries the item and principal it concerns, so a rejected
//!   request can be attributed without re-reading ledger state.
//! - Admission and validation failures are user errors. Only
//!   [`LedgerError::InternalConsistency`] indicates a defect.
//! - Errors are raised before any mutation. A returned error means the ledger
//!   is exactly as it was before the call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{ItemId, Principal};

/// Errors produced by ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the administrative principal.
    #[error("principal {caller} is not authorized for this operation")]
    Unauthorized {
        /// The principal that made the request.
        caller: Principal,
    },

    /// Request input failed validation (empty name or author).
    #[error("validation error: {0}")]
    Validation(String),

    /// An item with the same identifier has already been admitted.
    #[error("item {item} already exists")]
    DuplicateItem {
        /// The colliding identifier.
        item: ItemId,
    },

    /// No item with the identifier exists.
    #[error("item {item} not found")]
    ItemNotFound {
        /// The requested identifier.
        item: ItemId,
    },

    /// Every copy of the item is out on loan.
    #[error("item {item} unavailable: all {copies} copies are on loan")]
    ItemUnavailable {
        /// The requested identifier.
        item: ItemId,
        /// Total copies of the item.
        copies: u32,
    },

    /// Principal already holds an active loan of the item.
    #[error("principal {principal} is already borrowing {item}")]
    AlreadyBorrowing {
        /// The borrowing principal.
        principal: Principal,
        /// The item already held.
        item: ItemId,
    },

    /// Principal holds no active loan of the item.
    #[error("principal {principal} is not borrowing {item}")]
    NotBorrowing {
        /// The returning principal.
        principal: Principal,
        /// The item that was not held.
        item: ItemId,
    },

    /// Ledger state contradicts itself (e.g. a holder with no open loan record).
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

impl LedgerError {
    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Validation(_) => ErrorKind::Validation,
            Self::DuplicateItem { .. } => ErrorKind::DuplicateItem,
            Self::ItemNotFound { .. } => ErrorKind::ItemNotFound,
            Self::ItemUnavailable { .. } => ErrorKind::ItemUnavailable,
            Self::AlreadyBorrowing { .. } => ErrorKind::AlreadyBorrowing,
            Self::NotBorrowing { .. } => ErrorKind::NotBorrowing,
            Self::InternalConsistency(_) => ErrorKind::InternalConsistency,
        }
    }
}

/// Stable, payload-free classification of a [`LedgerError`].
///
/// Callers surface these verbatim to their own users; the string form is
/// part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Unauthorized,
    Validation,
    DuplicateItem,
    ItemNotFound,
    ItemUnavailable,
    AlreadyBorrowing,
    NotBorrowing,
    InternalConsistency,
}

impl ErrorKind {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation => "VALIDATION",
            Self::DuplicateItem => "DUPLICATE_ITEM",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::ItemUnavailable => "ITEM_UNAVAILABLE",
            Self::AlreadyBorrowing => "ALREADY_BORROWING",
            Self::NotBorrowing => "NOT_BORROWING",
            Self::InternalConsistency => "INTERNAL_CONSISTENCY",
        }
    }

    /// Whether this kind indicates a ledger defect rather than a rejected request.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::InternalConsistency)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
