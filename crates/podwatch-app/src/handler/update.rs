//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;
use podwatch_core::prelude::*;

use super::{feed, keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            if !state.quitting() {
                info!("Quit requested");
            }
            state.set_quitting();
            match state.request_stop() {
                Some(session_id) => UpdateResult::action(UpdateAction::StopFeed { session_id }),
                None => UpdateResult::none(),
            }
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        // Redraw happens on every loop iteration; nothing to update
        Message::Resize { width, height } => {
            trace!("Terminal resized to {}x{}", width, height);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Cursor Messages
        // ─────────────────────────────────────────────────────────
        Message::CursorUp => {
            state.cursor_up();
            UpdateResult::none()
        }
        Message::CursorDown => {
            state.cursor_down();
            UpdateResult::none()
        }
        Message::CursorTop => {
            state.cursor_top();
            UpdateResult::none()
        }
        Message::CursorBottom => {
            state.cursor_bottom();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Feed Messages
        // ─────────────────────────────────────────────────────────
        Message::StartFeed => feed::handle_start_feed(state),
        Message::StopFeed => feed::handle_stop_feed(state),
        Message::FeedStarted { session_id, source } => {
            feed::handle_feed_started(state, session_id, &source)
        }
        Message::FeedStartFailed {
            reason,
            recoverable,
        } => feed::handle_feed_start_failed(state, &reason, recoverable),
        Message::FeedStopped { session_id } => feed::handle_feed_stopped(state, session_id),
        Message::FeedTerminated { session_id, reason } => {
            feed::handle_feed_terminated(state, session_id, &reason)
        }
        Message::Feed { session_id, event } => feed::handle_feed_event(state, session_id, event),
    }
}
