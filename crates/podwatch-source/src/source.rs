//! The subscription contract between podwatch and a watch source

use tokio::sync::{mpsc, oneshot};

use podwatch_core::prelude::*;
use podwatch_core::Record;

/// Buffer size of the per-subscription event channel
pub const SUBSCRIPTION_CAPACITY: usize = 256;

/// One event as emitted by a watch source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Added(Record),
    Modified { old: Option<Record>, new: Record },
    Deleted(Record),
    /// The source hit an error; no further events follow
    Error(String),
}

/// A source of pod lifecycle events.
///
/// `subscribe` must not block: implementations spawn their own producer
/// (a child process reader, a timer-driven script) and hand back the
/// receiving end.
pub trait WatchSource: Send + Sync {
    /// Short human-readable name, used in logs and the status bar
    fn name(&self) -> &str;

    /// Open a new subscription. Must be called from within a tokio runtime.
    fn subscribe(&self) -> Result<Subscription>;
}

/// Live subscription to a [`WatchSource`].
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<SourceEvent>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl Subscription {
    pub fn new(events: mpsc::Receiver<SourceEvent>, cancel_tx: oneshot::Sender<()>) -> Self {
        Self {
            events,
            cancel_tx: Some(cancel_tx),
        }
    }

    /// Create the producer/consumer halves of a subscription.
    ///
    /// The producer gets the event sender and a cancel receiver that
    /// resolves once the consumer unsubscribes (or drops the subscription).
    pub fn channel() -> (
        Self,
        mpsc::Sender<SourceEvent>,
        oneshot::Receiver<()>,
    ) {
        let (event_tx, event_rx) = mpsc::channel(SUBSCRIPTION_CAPACITY);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        (Self::new(event_rx, cancel_tx), event_tx, cancel_rx)
    }

    /// Wait for the next event. `None` means the stream ended.
    pub async fn next_event(&mut self) -> Option<SourceEvent> {
        self.events.recv().await
    }

    /// Ask the producer to stop. Never blocks; calling it twice is harmless.
    pub fn unsubscribe(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            // Err means the producer already finished
            let _ = tx.send(());
            debug!("Subscription cancelled");
        }
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.cancel_tx.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
