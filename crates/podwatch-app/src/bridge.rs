//! Event bridge: relays a watch source subscription into the engine.
//!
//! The bridge holds at most one live feed session. Each session is a
//! forwarding task that turns [`SourceEvent`]s into [`Message::Feed`]s, in
//! source order, until it is told to stop or the source ends:
//!
//! - [`EventBridge::stop`] flips a `watch` flag. It never blocks; the task
//!   notices the flag inside its `select!` even while the source is silent
//!   and answers with [`Message::FeedStopped`].
//! - If the stream closes or yields an error the task sends
//!   [`Message::FeedTerminated`] instead.
//!
//! Either way the session handle stays held until the engine releases it,
//! so a second `start` in the meantime fails with [`Error::AlreadyWatching`].
//!
//! A send into a full intake still races the stop flag, and
//! [`EventBridge::shutdown`] drops the flag's sender so a final
//! acknowledgement nobody will read does not hold the task open.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::message::Message;
use podwatch_core::prelude::*;
use podwatch_core::{next_feed_session_id, FeedSessionId, LifecycleEvent};
use podwatch_source::{SourceEvent, Subscription, WatchSource};

/// Reason reported when a source closes its stream without an error
pub const STREAM_ENDED: &str = "watch stream ended";

/// Handle to the live forwarding task
#[derive(Debug)]
struct FeedHandle {
    session_id: FeedSessionId,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Owner of the (at most one) live feed session
#[derive(Debug, Default)]
pub struct EventBridge {
    active: Option<FeedHandle>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `source` and spawn a forwarding task into `intake`.
    ///
    /// Fails with [`Error::AlreadyWatching`] while a session is held; in that
    /// case nothing is subscribed or spawned.
    pub fn start(
        &mut self,
        source: &dyn WatchSource,
        intake: mpsc::Sender<Message>,
    ) -> Result<FeedSessionId> {
        if let Some(handle) = &self.active {
            debug!(
                "Refusing to start: session {} still held",
                handle.session_id
            );
            return Err(Error::AlreadyWatching);
        }

        let subscription = source.subscribe()?;
        let session_id = next_feed_session_id();
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(forward(session_id, subscription, stop_rx, intake));
        info!("Feed session {} started on {}", session_id, source.name());

        self.active = Some(FeedHandle {
            session_id,
            stop_tx,
            task,
        });
        Ok(session_id)
    }

    /// Signal the live session to stop. Never blocks; idempotent.
    pub fn stop(&self) {
        if let Some(handle) = &self.active {
            debug!("Signalling feed session {} to stop", handle.session_id);
            handle.stop_tx.send_replace(true);
        }
    }

    /// Forget the handle of a session that has ended.
    ///
    /// Returns false if `session_id` is not the held session.
    pub fn release(&mut self, session_id: FeedSessionId) -> bool {
        match &self.active {
            Some(handle) if handle.session_id == session_id => {
                self.active = None;
                debug!("Feed session {} released", session_id);
                true
            }
            _ => false,
        }
    }

    pub fn active_session(&self) -> Option<FeedSessionId> {
        self.active.as_ref().map(|h| h.session_id)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Stop the live session and wait for its task at most `timeout`.
    ///
    /// A task that does not finish in time is aborted.
    pub async fn shutdown(&mut self, timeout: Duration) {
        let Some(handle) = self.active.take() else {
            return;
        };

        let FeedHandle {
            session_id,
            stop_tx,
            task,
        } = handle;
        stop_tx.send_replace(true);
        drop(stop_tx);
        let abort = task.abort_handle();

        info!("Waiting for feed session {} to shut down...", session_id);
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(())) => info!("Feed session {} completed cleanly", session_id),
            Ok(Err(e)) => warn!("Feed session {} task panicked: {}", session_id, e),
            Err(_) => {
                warn!(
                    "Timeout waiting for feed session {} after {:?}, aborting",
                    session_id, timeout
                );
                abort.abort();
            }
        }
    }
}

/// Why a forwarding task ended
enum Ending {
    Stopped,
    Terminated(String),
    IntakeClosed,
}

/// Resolves once the stop flag is set, or the bridge side is gone
async fn stop_requested(stop_rx: &mut watch::Receiver<bool>) {
    let _ = stop_rx.wait_for(|stop| *stop).await;
}

/// Resolves once the bridge has dropped the stop flag's sender
async fn bridge_dropped(stop_rx: &mut watch::Receiver<bool>) {
    while stop_rx.changed().await.is_ok() {}
}

/// Forwarding task body for one session
async fn forward(
    session_id: FeedSessionId,
    mut subscription: Subscription,
    mut stop_rx: watch::Receiver<bool>,
    intake: mpsc::Sender<Message>,
) {
    let ending = loop {
        tokio::select! {
            biased;

            _ = stop_requested(&mut stop_rx) => break Ending::Stopped,

            next = subscription.next_event() => {
                let event = match next {
                    None => break Ending::Terminated(STREAM_ENDED.to_string()),
                    Some(SourceEvent::Error(reason)) => break Ending::Terminated(reason),
                    Some(SourceEvent::Added(r)) => LifecycleEvent::Added(r),
                    Some(SourceEvent::Modified { old, new }) => LifecycleEvent::Modified { old, new },
                    Some(SourceEvent::Deleted(r)) => LifecycleEvent::Deleted(r),
                };

                tokio::select! {
                    biased;

                    // The undelivered event is dropped along with the session
                    _ = stop_requested(&mut stop_rx) => break Ending::Stopped,

                    sent = intake.send(Message::Feed { session_id, event }) => {
                        if sent.is_err() {
                            break Ending::IntakeClosed;
                        }
                    }
                }
            }
        }
    };

    subscription.unsubscribe();

    let message = match ending {
        Ending::Stopped => {
            debug!("Feed session {} stopped", session_id);
            Message::FeedStopped { session_id }
        }
        Ending::Terminated(reason) => {
            warn!("Feed session {} terminated: {}", session_id, reason);
            Message::FeedTerminated { session_id, reason }
        }
        Ending::IntakeClosed => {
            debug!("Intake closed, feed session {} exiting", session_id);
            return;
        }
    };

    tokio::select! {
        biased;

        _ = intake.send(message) => {}
        _ = bridge_dropped(&mut stop_rx) => {
            debug!("Bridge gone, dropping final message of session {}", session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podwatch_core::Record;
    use podwatch_source::{ScriptEnd, ScriptedSource};

    const WAIT: Duration = Duration::from_secs(2);

    fn added(key: &str) -> SourceEvent {
        SourceEvent::Added(Record::new(key, "Running", "1m"))
    }

    async fn recv(rx: &mut mpsc::Receiver<Message>) -> Message {
        tokio::time::timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for message")
            .expect("intake closed")
    }

    #[tokio::test]
    async fn test_forwards_events_in_order() {
        let source = ScriptedSource::from_events(vec![
            added("b"),
            SourceEvent::Modified {
                old: None,
                new: Record::new("b", "Failed", "2m"),
            },
            SourceEvent::Deleted(Record::new("b", "Failed", "2m")),
        ]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();

        let id = bridge.start(&source, tx).unwrap();

        let kinds: Vec<&str> = [recv(&mut rx).await, recv(&mut rx).await, recv(&mut rx).await]
            .iter()
            .map(|m| match m {
                Message::Feed { session_id, event } => {
                    assert_eq!(*session_id, id);
                    event.kind()
                }
                other => panic!("unexpected message {:?}", other),
            })
            .collect();
        assert_eq!(kinds, vec!["added", "modified", "deleted"]);
    }

    #[tokio::test]
    async fn test_start_twice_is_already_watching() {
        let source = ScriptedSource::from_events(vec![]);
        let (tx, _rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();

        let first = bridge.start(&source, tx.clone()).unwrap();
        let second = bridge.start(&source, tx);

        assert!(matches!(second, Err(Error::AlreadyWatching)));
        assert_eq!(bridge.active_session(), Some(first));
    }

    #[tokio::test]
    async fn test_stop_interrupts_silent_source() {
        // HoldOpen with no steps: the source never emits anything
        let source = ScriptedSource::from_events(vec![]).with_end(ScriptEnd::HoldOpen);
        let (tx, mut rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();
        let id = bridge.start(&source, tx).unwrap();

        bridge.stop();

        assert!(matches!(
            recv(&mut rx).await,
            Message::FeedStopped { session_id } if session_id == id
        ));
        // Handle is held until released
        assert!(bridge.is_active());
        assert!(bridge.release(id));
        assert!(!bridge.is_active());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let source = ScriptedSource::from_events(vec![]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();
        let id = bridge.start(&source, tx).unwrap();

        bridge.stop();
        bridge.stop();

        assert!(matches!(
            recv(&mut rx).await,
            Message::FeedStopped { session_id } if session_id == id
        ));
        let extra = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(!matches!(extra, Ok(Some(_))));
    }

    #[tokio::test]
    async fn test_stream_end_reports_termination() {
        let source = ScriptedSource::from_events(vec![added("a")]).with_end(ScriptEnd::Close);
        let (tx, mut rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();
        let id = bridge.start(&source, tx).unwrap();

        assert!(matches!(recv(&mut rx).await, Message::Feed { .. }));
        match recv(&mut rx).await {
            Message::FeedTerminated { session_id, reason } => {
                assert_eq!(session_id, id);
                assert_eq!(reason, STREAM_ENDED);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_error_reports_termination_reason() {
        let source = ScriptedSource::from_events(vec![SourceEvent::Error("boom".to_string())]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();
        bridge.start(&source, tx).unwrap();

        assert!(matches!(
            recv(&mut rx).await,
            Message::FeedTerminated { reason, .. } if reason == "boom"
        ));
    }

    #[tokio::test]
    async fn test_release_ignores_other_sessions() {
        let source = ScriptedSource::from_events(vec![]);
        let (tx, _rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();
        let id = bridge.start(&source, tx).unwrap();

        assert!(!bridge.release(id + 1000));
        assert_eq!(bridge.active_session(), Some(id));
    }

    #[tokio::test]
    async fn test_shutdown_completes_within_timeout() {
        let source = ScriptedSource::from_events(vec![]);
        let (tx, _rx) = mpsc::channel(16);
        let mut bridge = EventBridge::new();
        bridge.start(&source, tx).unwrap();

        tokio::time::timeout(WAIT, bridge.shutdown(Duration::from_millis(500)))
            .await
            .expect("shutdown should be bounded");
        assert!(!bridge.is_active());
    }

    #[tokio::test]
    async fn test_shutdown_with_full_intake_finishes_before_timeout() {
        // Intake of capacity 1, never drained: the task blocks on send
        let source = ScriptedSource::from_events(vec![added("a"), added("b"), added("c")]);
        let (tx, _rx) = mpsc::channel(1);
        let mut bridge = EventBridge::new();
        bridge.start(&source, tx).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Far shorter than the shutdown timeout, so only a clean exit fits
        tokio::time::timeout(
            Duration::from_millis(500),
            bridge.shutdown(Duration::from_secs(30)),
        )
        .await
        .expect("blocked send should observe the stop flag");
        assert!(!bridge.is_active());
    }

    #[tokio::test]
    async fn test_stop_with_full_intake_drops_pending_event() {
        let source = ScriptedSource::from_events(vec![added("a"), added("b"), added("c")]);
        let (tx, mut rx) = mpsc::channel(1);
        let mut bridge = EventBridge::new();
        let id = bridge.start(&source, tx).unwrap();
        // "a" fills the intake, the task is now blocked sending "b"
        tokio::time::sleep(Duration::from_millis(50)).await;

        bridge.stop();

        assert!(matches!(recv(&mut rx).await, Message::Feed { .. }));
        assert!(matches!(
            recv(&mut rx).await,
            Message::FeedStopped { session_id } if session_id == id
        ));
    }
}
