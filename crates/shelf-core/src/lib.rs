//! # shelf-core — Foundational Types for the Shelf Ledger
//!
//! The leaf crate of the workspace. Every other crate depends on
//! `shelf-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `Principal`, `ItemId`, and `LoanId` are distinct
//!    types. `ItemId` is a structured `(name, author)` key, never a
//!    concatenated string.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision. The
//!    ledger reads time through the `Clock` trait so transitions are
//!    reproducible under test.
//!
//! 3. **One error taxonomy.** `LedgerError` has exactly one variant per
//!    failure kind, and `ErrorKind` is its stable, serializable tag.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shelf-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::{ErrorKind, LedgerError};
pub use identity::{ItemId, LoanId, Principal};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
