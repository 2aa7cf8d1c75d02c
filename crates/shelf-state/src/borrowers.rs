//! # Borrower Index
//!
//! Per-item set of principals currently holding an active loan. This is the
//! only place the ledger answers "is X borrowing Y"; item counters and loan
//! records are never consulted for that question.

use std::collections::{HashMap, HashSet};

use shelf_core::{ItemId, Principal};

/// Membership relation over `(item, principal)`.
#[derive(Debug, Clone, Default)]
pub struct BorrowerIndex {
    holders: HashMap<ItemId, HashSet<Principal>>,
}

impl BorrowerIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `principal` currently holds a copy of `item`.
    pub fn is_holder(&self, item: &ItemId, principal: &Principal) -> bool {
        self.holders
            .get(item)
            .is_some_and(|set| set.contains(principal))
    }

    /// Set or clear membership. Idempotent in both directions.
    pub fn set_holder(&mut self, item: &ItemId, principal: &Principal, value: bool) {
        if value {
            self.holders
                .entry(item.clone())
                .or_default()
                .insert(principal.clone());
        } else if let Some(set) = self.holders.get_mut(item) {
            set.remove(principal);
            if set.is_empty() {
                self.holders.remove(item);
            }
        }
    }

    /// Current holders of `item`, sorted.
    pub fn holders(&self, item: &ItemId) -> Vec<Principal> {
        let mut holders: Vec<Principal> = self
            .holders
            .get(item)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        holders.sort();
        holders
    }

    /// Number of principals holding `item`.
    pub fn holder_count(&self, item: &ItemId) -> usize {
        self.holders.get(item).map_or(0, HashSet::len)
    }
}
