//! # Ledger Notifications
//!
//! Events published after an operation commits. Delivery is fire-and-forget:
//! sinks cannot fail the operation and cannot observe rejected requests.
//!
//! The ledger depends only on the [`EventSink`] trait. Transports (queues,
//! websockets, logs) implement it outside the core.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use shelf_core::Principal;

use crate::catalog::Item;

/// A committed ledger change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new item was admitted to the catalog.
    ItemAdded {
        /// Snapshot of the item as admitted.
        item: Item,
    },
    /// A principal borrowed a copy of an item.
    ItemBorrowed {
        /// The borrower.
        principal: Principal,
        /// The item's display name.
        item_name: String,
    },
    /// A principal returned a copy of an item.
    ItemReturned {
        /// The returning principal.
        principal: Principal,
        /// The item's display name.
        item_name: String,
    },
}

impl LedgerEvent {
    /// Short name of the event, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemAdded { .. } => "item_added",
            Self::ItemBorrowed { .. } => "item_borrowed",
            Self::ItemReturned { .. } => "item_returned",
        }
    }
}

/// Subscriber for committed ledger events.
///
/// [`crate::Library`] calls `publish` while holding its write lock, so events
/// arrive in commit order and a slow sink delays every other operation.
pub trait EventSink: Send + Sync {
    /// Receive one event. Must not block on external I/O.
    fn publish(&self, event: &LedgerEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &LedgerEvent) {}
}

/// Logs every event through `tracing` at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::ItemAdded { item } => tracing::info!(
                event = event.name(),
                item = %item.id(),
                copies = item.copies(),
                "ledger event"
            ),
            LedgerEvent::ItemBorrowed {
                principal,
                item_name,
            }
            | LedgerEvent::ItemReturned {
                principal,
                item_name,
            } => tracing::info!(
                event = event.name(),
                principal = %principal,
                item_name = %item_name,
                "ledger event"
            ),
        }
    }
}

/// Keeps every event in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &LedgerEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Forwards each event to several sinks, in order.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    /// Create a fanout with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventSink for FanoutSink {
    fn publish(&self, event: &LedgerEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn borrowed(who: &str) -> LedgerEvent {
        LedgerEvent::ItemBorrowed {
            principal: Principal::new(who),
            item_name: "Dune".to_string(),
        }
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.publish(&borrowed("alice"));
        sink.publish(&borrowed("bob"));
        assert_eq!(sink.events(), vec![borrowed("alice"), borrowed("bob")]);
    }

    #[test]
    fn test_drain_empties_recorder() {
        let sink = RecordingSink::new();
        sink.publish(&borrowed("alice"));
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_fanout_delivers_to_every_sink() {
        let a = Arc::new(RecordingSink::new());
        let b = Arc::new(RecordingSink::new());
        let fanout = FanoutSink::new()
            .with(a.clone())
            .with(b.clone())
            .with(Arc::new(NullSink));
        fanout.publish(&borrowed("alice"));
        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events().len(), 1);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(borrowed("alice")).unwrap();
        assert_eq!(json["event"], "item_borrowed");
        assert_eq!(json["principal"], "alice");
        assert_eq!(json["item_name"], "Dune");
    }
}
