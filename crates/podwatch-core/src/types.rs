//! Core domain type definitions

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// One tracked pod, as shown in the dashboard
///
/// `key` is the pod's unique name and the primary key of the record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub status: String,
    /// Pre-formatted age ("5m", "2d"), or empty when unknown
    pub age: String,
}

impl Record {
    pub fn new(key: impl Into<String>, status: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: status.into(),
            age: age.into(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} - {}", self.key, self.status, self.age)
    }
}

/// State of the live watch feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedState {
    /// No active subscription
    #[default]
    Idle,
    /// A bridge session is forwarding events
    Watching,
    /// Stop was requested; waiting for the bridge to acknowledge
    Stopping,
}

impl FeedState {
    /// Whether a bridge session is still held (Watching or Stopping)
    pub fn is_active(&self) -> bool {
        !matches!(self, FeedState::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedState::Idle => "idle",
            FeedState::Watching => "watching",
            FeedState::Stopping => "stopping",
        }
    }
}

/// Unique identifier for a feed session
pub type FeedSessionId = u64;

static FEED_SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique feed session ID
pub fn next_feed_session_id() -> FeedSessionId {
    FEED_SESSION_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        let record = Record::new("pod-a", "Running", "5m");
        assert_eq!(record.to_string(), "pod-a : Running - 5m");
    }

    #[test]
    fn test_record_display_without_age() {
        let record = Record::new("pod-a", "Pending", "");
        assert_eq!(record.to_string(), "pod-a : Pending - ");
    }

    #[test]
    fn test_feed_state_default_is_idle() {
        assert_eq!(FeedState::default(), FeedState::Idle);
        assert!(!FeedState::Idle.is_active());
        assert!(FeedState::Watching.is_active());
        assert!(FeedState::Stopping.is_active());
    }

    #[test]
    fn test_feed_session_ids_increase() {
        let a = next_feed_session_id();
        let b = next_feed_session_id();
        assert!(b > a);
    }
}
