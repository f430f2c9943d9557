//! Message types for the application (TEA pattern)

use crate::input_key::InputKey;
use podwatch_core::{FeedSessionId, LifecycleEvent};

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Terminal was resized; only triggers a redraw
    Resize { width: u16, height: u16 },

    /// Quit: stop any active feed and end the controller loop
    Quit,

    // ─────────────────────────────────────────────────────────
    // Cursor Messages
    // ─────────────────────────────────────────────────────────
    /// Move the selection up one row
    CursorUp,
    /// Move the selection down one row
    CursorDown,
    /// Jump to the first row
    CursorTop,
    /// Jump to the last row
    CursorBottom,

    // ─────────────────────────────────────────────────────────
    // Feed Control Messages
    // ─────────────────────────────────────────────────────────
    /// Open a feed session (rejected while one is live)
    StartFeed,
    /// Ask the live feed session to stop
    StopFeed,

    // ─────────────────────────────────────────────────────────
    // Feed Lifecycle Messages (from the engine and the bridge)
    // ─────────────────────────────────────────────────────────
    /// Bridge session opened
    FeedStarted {
        session_id: FeedSessionId,
        source: String,
    },
    /// Subscribing to the source failed; no session was opened
    FeedStartFailed { reason: String, recoverable: bool },
    /// Bridge acknowledged a stop request
    FeedStopped { session_id: FeedSessionId },
    /// Source stream ended or errored
    FeedTerminated {
        session_id: FeedSessionId,
        reason: String,
    },

    /// A lifecycle event forwarded by the bridge
    Feed {
        session_id: FeedSessionId,
        event: LifecycleEvent,
    },
}
