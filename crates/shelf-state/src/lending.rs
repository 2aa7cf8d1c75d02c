//! # Lending State Machine
//!
//! Orchestrates catalog admission and borrow/return transitions over the
//! catalog, the borrower index, and the history ledger.
//!
//! ## States
//!
//! Per `(item, principal)` pair:
//!
//! ```text
//! NotBorrowing ──borrow──▶ Borrowing ──return──▶ NotBorrowing ──borrow──▶ ...
//! ```
//!
//! ## Admission
//!
//! Every check runs before the first mutation. A failed operation leaves
//! catalog, index, and ledger exactly as they were.
//!
//! - Borrow: item exists → a copy is free → caller is not already a holder.
//! - Return: caller is a holder → item exists → an open record for the caller
//!   exists in the item's history.
//!
//! The state machine is plain `&mut self` logic. Mutual exclusion and event
//! delivery belong to [`crate::Library`].

use serde::{Deserialize, Serialize};

use shelf_core::{ItemId, LedgerError, Principal, Timestamp};

use crate::access::AccessGate;
use crate::borrowers::BorrowerIndex;
use crate::catalog::{Catalog, Item};
use crate::history::{HistoryLedger, LoanRecord};

/// Lending state of one `(item, principal)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LendingState {
    /// Principal holds no copy of the item.
    NotBorrowing,
    /// Principal holds exactly one copy of the item.
    Borrowing,
}

impl std::fmt::Display for LendingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotBorrowing => "NOT_BORROWING",
            Self::Borrowing => "BORROWING",
        };
        f.write_str(s)
    }
}

/// The complete ledger state and its transition rules.
#[derive(Debug, Clone)]
pub struct LendingStateMachine {
    gate: AccessGate,
    catalog: Catalog,
    borrowers: BorrowerIndex,
    history: HistoryLedger,
}

impl LendingStateMachine {
    /// Create an empty ledger administered by `admin`.
    pub fn new(admin: Principal) -> Self {
        Self {
            gate: AccessGate::initialize(admin),
            catalog: Catalog::new(),
            borrowers: BorrowerIndex::new(),
            history: HistoryLedger::new(),
        }
    }

    /// The access gate.
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The borrower index.
    pub fn borrowers(&self) -> &BorrowerIndex {
        &self.borrowers
    }

    /// The history ledger.
    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// Admit a new item to the catalog. Admin only.
    pub fn add_item(
        &mut self,
        caller: &Principal,
        name: &str,
        copies: u32,
        author: &str,
    ) -> Result<Item, LedgerError> {
        self.gate.authorize(caller)?;
        let item = self.catalog.admit(name, copies, author)?;
        tracing::info!(item = %item.id(), copies = item.copies(), "item admitted");
        Ok(item)
    }

    /// Hand administrative authority to `successor`. Admin only.
    pub fn transfer_admin(
        &mut self,
        caller: &Principal,
        successor: Principal,
    ) -> Result<Principal, LedgerError> {
        let previous = self.gate.transfer(caller, successor)?;
        tracing::info!(from = %previous, to = %self.gate.admin(), "administrative authority transferred");
        Ok(previous)
    }

    /// Lend one copy of `item_id` to `caller` (NotBorrowing → Borrowing).
    ///
    /// Returns the newly opened loan record.
    pub fn borrow(
        &mut self,
        caller: &Principal,
        item_id: &ItemId,
        now: Timestamp,
    ) -> Result<LoanRecord, LedgerError> {
        let item = self.catalog.get_mut(item_id)?;
        if !item.is_available() {
            return Err(LedgerError::ItemUnavailable {
                item: item_id.clone(),
                copies: item.copies(),
            });
        }
        if self.borrowers.is_holder(item_id, caller) {
            return Err(LedgerError::AlreadyBorrowing {
                principal: caller.clone(),
                item: item_id.clone(),
            });
        }

        self.borrowers.set_holder(item_id, caller, true);
        item.record_checkout();
        let record = LoanRecord::open(item_id.clone(), caller.clone(), now);
        self.history.append(item.name(), record.clone());

        tracing::info!(
            item = %item_id,
            principal = %caller,
            active_loans = item.active_loans(),
            copies = item.copies(),
            "item borrowed"
        );
        Ok(record)
    }

    /// Take back the copy of `item_id` held by `caller` (Borrowing → NotBorrowing).
    ///
    /// Returns the finalized loan record. History is kept per item name, so
    /// the record closed is the caller's most recent open record under that
    /// name. When two items share a name and the caller holds both, that
    /// record may belong to the other item; its `item` field says which.
    pub fn return_item(
        &mut self,
        caller: &Principal,
        item_id: &ItemId,
        now: Timestamp,
    ) -> Result<LoanRecord, LedgerError> {
        if !self.borrowers.is_holder(item_id, caller) {
            return Err(LedgerError::NotBorrowing {
                principal: caller.clone(),
                item: item_id.clone(),
            });
        }
        let item = self.catalog.get_mut(item_id)?;
        if item.active_loans() == 0 {
            return Err(LedgerError::InternalConsistency(format!(
                "{caller} holds {item_id} but it has no active loans"
            )));
        }
        if self.history.latest_open(item.name(), caller).is_none() {
            return Err(LedgerError::InternalConsistency(format!(
                "{caller} holds {item_id} but has no open loan record"
            )));
        }

        self.borrowers.set_holder(item_id, caller, false);
        item.record_checkin();
        let record = self.history.finalize_latest_open(item.name(), caller, now)?;
        if record.item != *item_id {
            tracing::warn!(
                requested = %item_id,
                closed = %record.item,
                principal = %caller,
                "closed loan record of a same-name item"
            );
        }

        tracing::info!(
            item = %item_id,
            principal = %caller,
            active_loans = item.active_loans(),
            loan = %record.id,
            "item returned"
        );
        Ok(record)
    }

    /// Current lending state of `principal` for `item_id`.
    pub fn lending_state(&self, item_id: &ItemId, principal: &Principal) -> LendingState {
        if self.borrowers.is_holder(item_id, principal) {
            LendingState::Borrowing
        } else {
            LendingState::NotBorrowing
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────


// ─── Property tests ──────────────────────────────────────────────────

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Borrow(usize, usize),
        Return(usize, usize),
    }

    const PRINCIPALS: [&str; 4] = ["alice", "bob", "carol", "dave"];
    const TITLES: [(&str, u32); 3] = [("Dune", 2), ("Ubik", 1), ("Solaris", 3)];

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..PRINCIPALS.len(), 0..TITLES.len()).prop_map(|(p, i)| Op::Borrow(p, i)),
            (0..PRINCIPALS.len(), 0..TITLES.len()).prop_map(|(p, i)| Op::Return(p, i)),
        ]
    }

    fn seeded() -> LendingStateMachine {
        let admin = Principal::new("librarian");
        let mut sm = LendingStateMachine::new(admin.clone());
        for (title, copies) in TITLES {
            sm.add_item(&admin, title, copies, "Anon").unwrap();
        }
        sm
    }

    proptest! {
        /// Counters stay in bounds and agree with the borrower index and the
        /// open records in the history, after every operation.
        #[test]
        fn counters_match_index_and_history(ops in prop::collection::vec(op(), 0..64)) {
            let mut sm = seeded();
            for (step, op) in ops.into_iter().enumerate() {
                let now = Timestamp::from_epoch_secs(1_768_478_400 + step as i64).unwrap();
                let before = sm.clone();
                let result = match op {
                    Op::Borrow(p, i) => sm.borrow(
                        &Principal::new(PRINCIPALS[p]),
                        &ItemId::derive(TITLES[i].0, "Anon"),
                        now,
                    ),
                    Op::Return(p, i) => sm.return_item(
                        &Principal::new(PRINCIPALS[p]),
                        &ItemId::derive(TITLES[i].0, "Anon"),
                        now,
                    ),
                };
                if result.is_err() {
                    prop_assert_eq!(
                        before.catalog().iter().collect::<Vec<_>>(),
                        sm.catalog().iter().collect::<Vec<_>>()
                    );
                    prop_assert_eq!(before.history().len(), sm.history().len());
                }
                prop_assert!(!matches!(result, Err(LedgerError::InternalConsistency(_))));

                for item in sm.catalog().iter() {
                    prop_assert!(item.active_loans() <= item.copies());
                    let holders = sm.borrowers().holder_count(item.id());
                    prop_assert_eq!(holders as u32, item.active_loans());
                    let open = sm
                        .history()
                        .history_for(item.name())
                        .iter()
                        .filter(|r| r.is_open())
                        .count();
                    prop_assert_eq!(open as u32, item.active_loans());
                }
            }
        }

        /// Borrow followed by return restores the counter and the membership.
        #[test]
        fn borrow_return_round_trip(p in 0..PRINCIPALS.len(), i in 0..TITLES.len()) {
            let mut sm = seeded();
            let who = Principal::new(PRINCIPALS[p]);
            let id = ItemId::derive(TITLES[i].0, "Anon");
            let now = Timestamp::from_epoch_secs(1_768_478_400).unwrap();
            let before = sm.catalog().get(&id).unwrap().active_loans();

            sm.borrow(&who, &id, now).unwrap();
            sm.return_item(&who, &id, now).unwrap();

            prop_assert_eq!(sm.catalog().get(&id).unwrap().active_loans(), before);
            prop_assert_eq!(sm.lending_state(&id, &who), LendingState::NotBorrowing);
        }
    }
}
