//! # History Ledger
//!
//! Append-only audit trail of loans, one sequence per item name.
//!
//! ## Invariants
//!
//! - Records are appended in chronological order and never removed,
//!   compacted, or reordered.
//! - A record is written once when the loan opens and finalized exactly once
//!   when it closes. Finalization only sets `ended_at`.
//! - On return, the record finalized is the newest open record for that item
//!   name held by the returning principal.
//!
//! Sequences are keyed by display name, so two items sharing a name (with
//! different authors) share one sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shelf_core::{ItemId, LedgerError, LoanId, Principal, Timestamp};

/// One borrow-to-return interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Unique identifier of this record.
    pub id: LoanId,
    /// The item that was lent.
    pub item: ItemId,
    /// Display name of the item at the time of the loan.
    pub item_name: String,
    /// The borrowing principal.
    pub principal: Principal,
    /// When the loan opened.
    pub started_at: Timestamp,
    /// When the loan closed; `None` while the loan is active.
    pub ended_at: Option<Timestamp>,
}

impl LoanRecord {
    /// Open a new loan record.
    pub fn open(item: ItemId, principal: Principal, started_at: Timestamp) -> Self {
        Self {
            id: LoanId::new(),
            item_name: item.name().to_string(),
            item,
            principal,
            started_at,
            ended_at: None,
        }
    }

    /// Whether the loan is still active.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Per-item-name sequences of [`LoanRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    sequences: HashMap<String, Vec<LoanRecord>>,
}

impl HistoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the sequence for `item_name`.
    pub fn append(&mut self, item_name: &str, record: LoanRecord) {
        self.sequences
            .entry(item_name.to_string())
            .or_default()
            .push(record);
    }

    /// The newest open record for `item_name` held by `principal`.
    pub fn latest_open(&self, item_name: &str, principal: &Principal) -> Option<&LoanRecord> {
        let records = self.sequences.get(item_name)?;
        records
            .iter()
            .rev()
            .find(|record| record.is_open() && &record.principal == principal)
    }

    /// Close the newest open record for `item_name` held by `principal`.
    ///
    /// Scans newest to oldest and stops at the first match. Fails with
    /// `InternalConsistency` when no such record exists.
    pub fn finalize_latest_open(
        &mut self,
        item_name: &str,
        principal: &Principal,
        ended_at: Timestamp,
    ) -> Result<LoanRecord, LedgerError> {
        let record = self
            .sequences
            .get_mut(item_name)
            .and_then(|records| {
                records
                    .iter_mut()
                    .rev()
                    .find(|record| record.is_open() && &record.principal == principal)
            })
            .ok_or_else(|| {
                LedgerError::InternalConsistency(format!(
                    "no open loan record for {principal} on {item_name:?}"
                ))
            })?;
        record.ended_at = Some(ended_at);
        Ok(record.clone())
    }

    /// The full sequence for `item_name`, oldest first. Empty if unknown.
    pub fn history_for(&self, item_name: &str) -> Vec<LoanRecord> {
        self.sequences.get(item_name).cloned().unwrap_or_default()
    }

    /// Every item name with at least one record.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    /// Total number of records across all names.
    pub fn len(&self) -> usize {
        self.sequences.values().map(Vec::len).sum()
    }

    /// Whether no loan has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
