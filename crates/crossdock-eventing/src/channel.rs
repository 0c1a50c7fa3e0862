//! Transaction-scoped staging of domain events.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Identifier of one unit of work against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(u64);

impl TxId {
    /// Wraps a raw transaction counter value.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// Buffers events raised inside a unit of work and releases them to the
/// dispatcher only once that unit of work commits.
///
/// Raising is synchronous and cheap; delivery to handlers happens later on
/// the dispatcher task. A unit of work that rolls back (or is dropped
/// without committing) releases nothing, so subscribers never observe
/// events from abandoned state.
pub struct EventChannel<E> {
    pending: Mutex<HashMap<TxId, Vec<E>>>,
    delivery: mpsc::UnboundedSender<E>,
}

impl<E: fmt::Debug + Send> EventChannel<E> {
    /// Creates the channel together with the receiving end the dispatcher
    /// drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (delivery, receiver) = mpsc::unbounded_channel();
        let channel = Self {
            pending: Mutex::new(HashMap::new()),
            delivery,
        };
        (channel, receiver)
    }

    /// Stages `event` under the unit of work `tx`.
    pub fn raise(&self, tx: TxId, event: E) {
        debug!(%tx, event = ?event, "domain event staged");
        self.pending
            .lock()
            .expect("event channel mutex poisoned")
            .entry(tx)
            .or_default()
            .push(event);
    }

    /// Releases every event staged under `tx` to the dispatcher, in raise
    /// order.
    ///
    /// The staging buffer is consumed, so committing the same unit of work
    /// twice releases its events exactly once. Releasing after the
    /// dispatcher has shut down drops the events with a warning; delivery
    /// is best-effort once the process is tearing down.
    pub fn commit(&self, tx: TxId) {
        let staged = self
            .pending
            .lock()
            .expect("event channel mutex poisoned")
            .remove(&tx);
        let Some(events) = staged else {
            return;
        };
        debug!(%tx, released = events.len(), "unit of work committed");
        for event in events {
            if self.delivery.send(event).is_err() {
                warn!(%tx, "dispatcher stopped; committed event dropped");
            }
        }
    }

    /// Discards every event staged under `tx`.
    pub fn rollback(&self, tx: TxId) {
        let discarded = self
            .pending
            .lock()
            .expect("event channel mutex poisoned")
            .remove(&tx);
        if let Some(events) = discarded {
            debug!(%tx, discarded = events.len(), "unit of work rolled back");
        }
    }

    /// Number of events currently staged under `tx`.
    #[must_use]
    pub fn staged_count(&self, tx: TxId) -> usize {
        self.pending
            .lock()
            .expect("event channel mutex poisoned")
            .get(&tx)
            .map_or(0, Vec::len)
    }
}
