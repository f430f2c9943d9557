//! Feed lifecycle and record event handlers

use podwatch_core::prelude::*;
use podwatch_core::{FeedSessionId, LifecycleEvent};

use crate::state::{AppState, Notice};

use super::{UpdateAction, UpdateResult};

/// Handle a request to start watching
pub fn handle_start_feed(state: &mut AppState) -> UpdateResult {
    if state.quitting() {
        debug!("Ignoring start request while quitting");
        return UpdateResult::none();
    }

    if state.feed_state().is_active() {
        let err = Error::AlreadyWatching;
        debug!("Start rejected: {}", err);
        state.set_notice(Notice::warning(err.to_string()));
        return UpdateResult::none();
    }

    UpdateResult::action(UpdateAction::StartFeed)
}

/// Handle a request to stop watching
pub fn handle_stop_feed(state: &mut AppState) -> UpdateResult {
    match state.request_stop() {
        Some(session_id) => {
            info!("Stopping feed session {}", session_id);
            UpdateResult::action(UpdateAction::StopFeed { session_id })
        }
        None => {
            debug!("Stop ignored, feed is {}", state.feed_state().label());
            UpdateResult::none()
        }
    }
}

/// The engine opened a bridge session
pub fn handle_feed_started(
    state: &mut AppState,
    session_id: FeedSessionId,
    source: &str,
) -> UpdateResult {
    if !state.begin_watching(session_id, source) {
        // The bridge guards this too; reaching here means the two disagree
        warn!(
            "Feed session {} started while {} is {}",
            session_id,
            state.feed_session().unwrap_or_default(),
            state.feed_state().label()
        );
        return UpdateResult::none();
    }

    info!("Watching pods via {} (session {})", source, session_id);
    state.set_notice(Notice::info(format!("Watching pods via {}", source)));
    UpdateResult::none()
}

/// Subscribing to the source failed
///
/// Recoverable failures (kubectl missing, spawn refused) get a warning
/// notice; `w` retries.
pub fn handle_feed_start_failed(
    state: &mut AppState,
    reason: &str,
    recoverable: bool,
) -> UpdateResult {
    if recoverable {
        warn!("Feed did not start: {}", reason);
        state.set_notice(Notice::warning(reason));
    } else {
        error!("Failed to start feed: {}", reason);
        state.set_notice(Notice::error(reason));
    }
    UpdateResult::none()
}

/// The bridge acknowledged a stop request
pub fn handle_feed_stopped(state: &mut AppState, session_id: FeedSessionId) -> UpdateResult {
    if !state.end_feed(session_id) {
        debug!("Ignoring stop acknowledgement from stale session {}", session_id);
        return UpdateResult::none();
    }

    info!("Feed session {} stopped", session_id);
    state.set_notice(Notice::info("Feed stopped"));
    UpdateResult::action(UpdateAction::ReleaseFeed { session_id })
}

/// The source stream ended or failed: treated as an implicit stop
pub fn handle_feed_terminated(
    state: &mut AppState,
    session_id: FeedSessionId,
    reason: &str,
) -> UpdateResult {
    if !state.end_feed(session_id) {
        debug!(
            "Ignoring termination of stale session {}: {}",
            session_id, reason
        );
        return UpdateResult::none();
    }

    let err = Error::feed_terminated(reason);
    warn!("{}", err);
    state.set_notice(Notice::warning(err.to_string()));
    UpdateResult::action(UpdateAction::ReleaseFeed { session_id })
}

/// Apply one lifecycle event to the record list
pub fn handle_feed_event(
    state: &mut AppState,
    session_id: FeedSessionId,
    event: LifecycleEvent,
) -> UpdateResult {
    trace!("Session {}: {} {}", session_id, event.kind(), event.key());

    if let Err(err) = state.apply(event) {
        warn!("{}", err);
        state.set_notice(Notice::warning(err.to_string()));
    }

    UpdateResult::none()
}
