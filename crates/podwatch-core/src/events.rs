//! Lifecycle events delivered to the reconciler

use crate::types::Record;

/// A pod's entry into, change within, or removal from the observed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Added(Record),
    Modified {
        /// Previous state, when the source knows it
        old: Option<Record>,
        new: Record,
    },
    Deleted(Record),
}

impl LifecycleEvent {
    /// Key the event is primarily about (old key for modifies)
    pub fn key(&self) -> &str {
        match self {
            LifecycleEvent::Added(r) | LifecycleEvent::Deleted(r) => &r.key,
            LifecycleEvent::Modified { old: Some(old), .. } => &old.key,
            LifecycleEvent::Modified { old: None, new } => &new.key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::Added(_) => "added",
            LifecycleEvent::Modified { .. } => "modified",
            LifecycleEvent::Deleted(_) => "deleted",
        }
    }
}
