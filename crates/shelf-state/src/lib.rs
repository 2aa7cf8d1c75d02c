//! # shelf-state — Lending Ledger State Machine
//!
//! Tracks a catalog of items with finite copy counts, who currently holds a
//! copy, and an append-only history of loans.
//!
//! ## Components
//!
//! - **Access gate** (`access.rs`): the single administrative principal and
//!   its transfer.
//! - **Catalog** (`catalog.rs`): item admission, lookup, availability listing.
//! - **Borrower index** (`borrowers.rs`): who holds which item right now.
//! - **History ledger** (`history.rs`): per-item-name loan records.
//! - **Lending state machine** (`lending.rs`): borrow/return transitions and
//!   their admission checks.
//! - **Events** (`events.rs`): post-commit notifications and sinks.
//! - **Library** (`library.rs`): the thread-safe service wrapping all of the
//!   above behind one lock.
//!
//! ## Invariants
//!
//! - `0 <= active_loans <= copies` for every item.
//! - A principal holds at most one copy of a given item at a time.
//! - A failed operation changes nothing and publishes nothing.

pub mod access;
pub mod borrowers;
pub mod catalog;
pub mod events;
pub mod history;
pub mod lending;
pub mod library;

pub use access::AccessGate;
pub use borrowers::BorrowerIndex;
pub use catalog::{Catalog, Item};
pub use events::{EventSink, FanoutSink, LedgerEvent, NullSink, RecordingSink, TracingSink};
pub use history::{HistoryLedger, LoanRecord};
pub use lending::{LendingState, LendingStateMachine};
pub use library::{Library, LibrarySnapshot};
