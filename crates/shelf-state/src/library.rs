//! # Library Service
//!
//! The shared, thread-safe entry point to the ledger. Wraps a
//! [`LendingStateMachine`] in a single `parking_lot::RwLock`:
//!
//! - Mutations (`add_item`, `transfer_admin`, `borrow`, `return_item`) hold
//!   the write lock for their whole check-then-mutate sequence, so no caller
//!   can observe or interleave with a half-applied transition.
//! - Queries hold the read lock and return owned snapshots; concurrent
//!   queries never block each other.
//!
//! Events are published to the configured [`EventSink`] while the write lock
//! is still held, and only for operations that committed. Subscribers
//! therefore see events in commit order. A sink that blocks stalls the
//! whole ledger.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use shelf_core::{Clock, ItemId, LedgerError, Principal, SystemClock};

use crate::catalog::Item;
use crate::events::{EventSink, LedgerEvent, NullSink};
use crate::history::LoanRecord;
use crate::lending::{LendingState, LendingStateMachine};

/// Point-in-time copy of the whole ledger, taken under one read lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Administrative principal.
    pub admin: Principal,
    /// Every item, in admission order.
    pub items: Vec<Item>,
    /// Every loan record, grouped by item name.
    pub history: BTreeMap<String, Vec<LoanRecord>>,
}

/// Thread-safe lending ledger.
pub struct Library {
    state: RwLock<LendingStateMachine>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl Library {
    /// Create an empty library administered by `admin`, using wall-clock
    /// time and discarding events.
    pub fn new(admin: Principal) -> Self {
        Self {
            state: RwLock::new(LendingStateMachine::new(admin)),
            clock: Arc::new(SystemClock),
            sink: Arc::new(NullSink),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the event subscriber.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    // -- Mutations ------------------------------------------------------------

    /// Admit a new item. Admin only. Returns the item's identifier.
    pub fn add_item(
        &self,
        caller: &Principal,
        name: &str,
        copies: u32,
        author: &str,
    ) -> Result<ItemId, LedgerError> {
        let mut state = self.state.write();
        let item = state
            .add_item(caller, name, copies, author)
            .map_err(|e| rejected("add_item", caller, e))?;
        let id = item.id().clone();
        self.sink.publish(&LedgerEvent::ItemAdded { item });
        Ok(id)
    }

    /// Hand administrative authority to `successor`. Admin only.
    pub fn transfer_admin(&self, caller: &Principal, successor: Principal) -> Result<(), LedgerError> {
        let result = self.state.write().transfer_admin(caller, successor);
        result.map_err(|e| rejected("transfer_admin", caller, e))?;
        Ok(())
    }

    /// Borrow one copy of `item` for `caller`. Returns the opened loan record.
    pub fn borrow(&self, caller: &Principal, item: &ItemId) -> Result<LoanRecord, LedgerError> {
        let mut state = self.state.write();
        let now = self.clock.now();
        let record = state
            .borrow(caller, item, now)
            .map_err(|e| rejected("borrow", caller, e))?;
        self.sink.publish(&LedgerEvent::ItemBorrowed {
            principal: caller.clone(),
            item_name: record.item_name.clone(),
        });
        Ok(record)
    }

    /// Return the copy of `item` held by `caller`. Returns the closed loan record.
    ///
    /// The closed record is the caller's latest open record under the item's
    /// name. If the caller also holds another item with the same name, it can
    /// be that item's record; check `record.item`.
    pub fn return_item(&self, caller: &Principal, item: &ItemId) -> Result<LoanRecord, LedgerError> {
        let mut state = self.state.write();
        let now = self.clock.now();
        let record = state
            .return_item(caller, item, now)
            .map_err(|e| rejected("return_item", caller, e))?;
        self.sink.publish(&LedgerEvent::ItemReturned {
            principal: caller.clone(),
            item_name: record.item_name.clone(),
        });
        Ok(record)
    }

    // -- Queries --------------------------------------------------------------

    /// Items with at least one free copy, in admission order.
    pub fn list_available(&self) -> Vec<Item> {
        self.state.read().catalog().list_available()
    }

    /// Every loan record for `item_name`, oldest first. Empty if unknown.
    pub fn history_for(&self, item_name: &str) -> Vec<LoanRecord> {
        self.state.read().history().history_for(item_name)
    }

    /// Whether an item with this identifier exists.
    pub fn exists(&self, item: &ItemId) -> bool {
        self.state.read().catalog().exists(item)
    }

    /// Look up one item.
    pub fn get(&self, item: &ItemId) -> Result<Item, LedgerError> {
        self.state.read().catalog().get(item).cloned()
    }

    /// Every item, in admission order.
    pub fn items(&self) -> Vec<Item> {
        self.state.read().catalog().iter().cloned().collect()
    }

    /// Principals currently holding `item`, sorted.
    pub fn holders(&self, item: &ItemId) -> Vec<Principal> {
        self.state.read().borrowers().holders(item)
    }

    /// Lending state of `principal` for `item`.
    pub fn lending_state(&self, item: &ItemId, principal: &Principal) -> LendingState {
        self.state.read().lending_state(item, principal)
    }

    /// The current administrative principal.
    pub fn admin(&self) -> Principal {
        self.state.read().gate().admin().clone()
    }

    /// Consistent copy of the whole ledger.
    pub fn snapshot(&self) -> LibrarySnapshot {
        let state = self.state.read();
        let history = state
            .history()
            .item_names()
            .map(|name| (name.to_string(), state.history().history_for(name)))
            .collect();
        LibrarySnapshot {
            admin: state.gate().admin().clone(),
            items: state.catalog().iter().cloned().collect(),
            history,
        }
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Library")
            .field("admin", state.gate().admin())
            .field("items", &state.catalog().len())
            .field("loan_records", &state.history().len())
            .finish()
    }
}

/// Log a rejected request and pass the error through.
fn rejected(operation: &'static str, caller: &Principal, err: LedgerError) -> LedgerError {
    if err.kind().is_defect() {
        tracing::error!(operation, principal = %caller, error = %err, "ledger consistency failure");
    } else {
        tracing::debug!(operation, principal = %caller, kind = %err.kind(), "request rejected");
    }
    err
}
