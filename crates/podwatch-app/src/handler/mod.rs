//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event to message mapping
//! - `feed`: Feed lifecycle and record event handlers

pub(crate) mod feed;
pub(crate) mod keys;
pub(crate) mod update;


use crate::message::Message;
use podwatch_core::FeedSessionId;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the engine should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Subscribe to the watch source and open a bridge session
    StartFeed,

    /// Signal the bridge session to stop. Never blocks; the bridge answers
    /// with `Message::FeedStopped`.
    StopFeed { session_id: FeedSessionId },

    /// Drop the bridge's handle for a session that has ended
    ReleaseFeed { session_id: FeedSessionId },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the engine to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
