//! User-interaction signal bus
//!
//! The host page forwards document-level interaction events into a bounded
//! channel; the session watcher consumes them and refreshes the idle clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

/// The fixed set of interaction signals that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerPress,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

/// A bounded channel-based activity bus
///
/// Uses `try_send` for non-blocking emission. High-frequency signals
/// (pointer moves, scrolling) that arrive while the channel is full are
/// dropped and counted; a dropped signal only delays a refresh that the
/// next delivered signal performs anyway.
pub struct ActivityBus {
    tx: mpsc::Sender<ActivityKind>,
    dropped: Arc<AtomicU64>,
}

impl ActivityBus {
    /// Create a new ActivityBus with the specified channel capacity
    ///
    /// Returns the bus (for emitting signals) and the receiver the watcher
    /// subscribes to.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ActivityKind>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Emit an interaction signal
    ///
    /// Non-blocking: if the channel is full, the signal is dropped and the
    /// drop counter is incremented.
    pub fn emit(&self, kind: ActivityKind) {
        if self.tx.try_send(kind).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of signals dropped since the bus was created
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Whether the watcher side has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Clone for ActivityBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }
}
