//! Process-wide cart count broadcast.
//!
//! Screens outside the cart (the tab badge, the product detail view) need the
//! total item count without holding a cart reference. The count is published
//! through a `tokio::sync::watch` channel: an explicit observable with a
//! defined set of subscribers rather than ambient global state, so
//! propagation is testable.

use std::sync::Arc;

use tokio::sync::watch;

/// A shared observable integer holding the cart's total item count.
///
/// Writers must always publish a freshly computed total, never an incremental
/// delta derived from a stale read - deltas drift when writers race.
/// May be transiently stale between a mutation and its propagation.
#[derive(Debug, Clone)]
pub struct CartCountSignal {
    tx: Arc<watch::Sender<u32>>,
}

impl CartCountSignal {
    /// A new signal starting at zero.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// The most recently published count.
    #[must_use]
    pub fn read(&self) -> u32 {
        *self.tx.borrow()
    }

    /// Publish a freshly computed count.
    pub fn write(&self, count: u32) {
        self.tx.send_replace(count);
    }

    /// Subscribe to count changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.tx.subscribe()
    }
}

impl Default for CartCountSignal {
    fn default() -> Self {
        Self::new()
    }
}
