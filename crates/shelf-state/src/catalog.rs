//! # Catalog
//!
//! The mapping from item identifier to item record, and the source of truth
//! for copy counts and active-loan counters.
//!
//! ## Admission Rules
//!
//! - Name and author must be non-empty.
//! - The derived identifier must not already be present.
//! - A copy count of zero is normalized to one, not rejected.
//!
//! Items are never removed. Listing preserves admission order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shelf_core::{ItemId, LedgerError};

// ─── Item ────────────────────────────────────────────────────────────

/// A lendable work with a fixed number of copies.
///
/// Invariant: `active_loans <= copies`. The counters are only moved by the
/// lending state machine, after its admission checks pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    author: String,
    copies: u32,
    active_loans: u32,
}

impl Item {
    /// The catalog identifier.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Total copies, always at least one.
    pub fn copies(&self) -> u32 {
        self.copies
    }

    /// Copies currently out on loan.
    pub fn active_loans(&self) -> u32 {
        self.active_loans
    }

    /// Whether at least one copy can be borrowed.
    pub fn is_available(&self) -> bool {
        self.active_loans < self.copies
    }

    pub(crate) fn record_checkout(&mut self) {
        debug_assert!(self.is_available());
        self.active_loans = self.active_loans.saturating_add(1).min(self.copies);
    }

    pub(crate) fn record_checkin(&mut self) {
        debug_assert!(self.active_loans > 0);
        self.active_loans = self.active_loans.saturating_sub(1);
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────

/// Insertion-ordered item store keyed by [`ItemId`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and admit a new item, returning a snapshot of it.
    ///
    /// Authorization is the caller's responsibility; this only enforces the
    /// catalog's own admission rules.
    pub fn admit(&mut self, name: &str, copies: u32, author: &str) -> Result<Item, LedgerError> {
        if name.is_empty() {
            return Err(LedgerError::Validation("item name must not be empty".into()));
        }
        if author.is_empty() {
            return Err(LedgerError::Validation("item author must not be empty".into()));
        }

        let id = ItemId::derive(name, author);
        if self.index.contains_key(&id) {
            return Err(LedgerError::DuplicateItem { item: id });
        }

        let item = Item {
            id: id.clone(),
            name: name.to_string(),
            author: author.to_string(),
            copies: copies.max(1),
            active_loans: 0,
        };
        self.index.insert(id, self.items.len());
        self.items.push(item.clone());
        Ok(item)
    }

    /// Whether an item with this identifier has been admitted.
    pub fn exists(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up an item, failing with `ItemNotFound` when absent.
    pub fn get(&self, id: &ItemId) -> Result<&Item, LedgerError> {
        self.index
            .get(id)
            .map(|&slot| &self.items[slot])
            .ok_or_else(|| LedgerError::ItemNotFound { item: id.clone() })
    }

    pub(crate) fn get_mut(&mut self, id: &ItemId) -> Result<&mut Item, LedgerError> {
        match self.index.get(id) {
            Some(&slot) => Ok(&mut self.items[slot]),
            None => Err(LedgerError::ItemNotFound { item: id.clone() }),
        }
    }

    /// Items with at least one free copy, in admission order.
    pub fn list_available(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| item.is_available())
            .cloned()
            .collect()
    }

    /// All items, in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Number of admitted items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item has been admitted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
