//! Engine - orchestration state for the controller loop
//!
//! The Engine owns the TEA model, the single intake channel every producer
//! writes into (bridge, input pump, signal handler), the event bridge and the
//! watch source it subscribes to. Frontends only pull messages and feed them
//! back through [`Engine::process_message`].

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::bridge::EventBridge;
use crate::config::Settings;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::state::{AppState, ViewSnapshot};
use podwatch_core::prelude::*;
use podwatch_source::WatchSource;

/// Capacity of the intake channel
pub const INTAKE_CAPACITY: usize = 256;

/// Orchestration engine for podwatch.
pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,
    /// Sender half of the intake channel.
    /// Clone this to give to input sources (bridge, input pump, signal handler).
    pub msg_tx: mpsc::Sender<Message>,
    /// Receiver half of the intake channel; drained by the controller loop.
    pub msg_rx: mpsc::Receiver<Message>,
    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,
    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,
    /// Loaded settings
    pub settings: Settings,
    bridge: EventBridge,
    source: Arc<dyn WatchSource>,
}

impl Engine {
    pub fn new(source: Arc<dyn WatchSource>, settings: Settings) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(INTAKE_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            state: AppState::new(),
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            settings,
            bridge: EventBridge::new(),
            source,
        }
    }

    /// Kick off the feed if `behavior.auto_start` is set
    pub fn start(&mut self) {
        if self.settings.behavior.auto_start {
            self.process_message(Message::StartFeed);
        } else {
            info!("auto_start disabled, press 'w' to watch");
        }
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Follow-up messages (from the handler or from executing an action) are
    /// processed before returning, so no other input interleaves with them.
    pub fn process_message(&mut self, message: Message) {
        let mut pending = VecDeque::from([message]);

        while let Some(msg) = pending.pop_front() {
            let result = handler::update(&mut self.state, msg);

            if let Some(action) = result.action {
                if let Some(follow_up) = self.handle_action(action) {
                    pending.push_back(follow_up);
                }
            }
            if let Some(follow_up) = result.message {
                pending.push_back(follow_up);
            }
        }
    }

    /// Execute an action returned by the update function
    fn handle_action(&mut self, action: UpdateAction) -> Option<Message> {
        match action {
            UpdateAction::StartFeed => {
                match self.bridge.start(self.source.as_ref(), self.msg_tx.clone()) {
                    Ok(session_id) => Some(Message::FeedStarted {
                        session_id,
                        source: self.source.name().to_string(),
                    }),
                    Err(e) => Some(Message::FeedStartFailed {
                        reason: e.to_string(),
                        recoverable: e.is_recoverable(),
                    }),
                }
            }

            UpdateAction::StopFeed { session_id } => {
                if self.bridge.active_session() == Some(session_id) {
                    self.bridge.stop();
                } else {
                    debug!("Stop for session {} not held by the bridge", session_id);
                }
                None
            }

            UpdateAction::ReleaseFeed { session_id } => {
                self.bridge.release(session_id);
                None
            }
        }
    }

    /// Wait for the next message on the intake channel
    pub async fn next_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    /// Process everything already queued without waiting
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.snapshot()
    }

    pub fn feed_active(&self) -> bool {
        self.bridge.is_active()
    }

    /// Signal background tasks and stop the feed, waiting at most
    /// `feed.stop_timeout_ms` before abandoning it.
    pub async fn shutdown(&mut self) {
        self.shutdown_tx.send_replace(true);

        self.bridge.shutdown(self.settings.feed.stop_timeout()).await;

        // Apply the stop acknowledgement if it made it into the queue
        self.drain_pending_messages();

        if self.state.feed_state().is_active() {
            warn!(
                "Feed still {} at shutdown",
                self.state.feed_state().label()
            );
        }
    }
}
