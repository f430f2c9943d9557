//! Application state (Model in TEA pattern)
//!
//! `AppState` is the reconciler: it owns the sorted record list, the cursor
//! and the feed state. Records change only through [`AppState::apply`];
//! everything outside this module reads them through accessors or a cloned
//! [`ViewSnapshot`].

use podwatch_core::prelude::*;
use podwatch_core::{FeedSessionId, FeedState, LifecycleEvent, Record};

/// Severity of a status-bar notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Last noteworthy thing that happened, shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Immutable copy of everything the renderer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub quitting: bool,
    pub records: Vec<Record>,
    pub cursor: usize,
    pub feed_state: FeedState,
    pub source_name: String,
    pub notice: Option<Notice>,
    pub dropped_updates: u64,
}

/// Complete application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Sorted ascending by key, keys unique
    records: Vec<Record>,
    cursor: usize,
    feed_state: FeedState,
    /// Session the feed state refers to (Watching or Stopping)
    feed_session: Option<FeedSessionId>,
    quitting: bool,
    notice: Option<Notice>,
    /// Modified events dropped because their key was unknown
    dropped_updates: u64,
    /// Name of the source the last session subscribed to
    source_name: String,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&Record> {
        self.records.get(self.cursor)
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed_state
    }

    pub fn feed_session(&self) -> Option<FeedSessionId> {
        self.feed_session
    }

    pub fn quitting(&self) -> bool {
        self.quitting
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dropped_updates(&self) -> u64 {
        self.dropped_updates
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            quitting: self.quitting,
            records: self.records.clone(),
            cursor: self.cursor,
            feed_state: self.feed_state,
            source_name: self.source_name.clone(),
            notice: self.notice.clone(),
            dropped_updates: self.dropped_updates,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Record reconciliation
    // ─────────────────────────────────────────────────────────

    /// Apply one lifecycle event to the record list.
    ///
    /// Returns [`Error::UnknownKeyOnModify`] when a modify matches neither
    /// its old nor its new key; the event is dropped and counted.
    pub fn apply(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::Added(record) => self.upsert(record),

            LifecycleEvent::Modified { old, new } => {
                let index = old
                    .as_ref()
                    .and_then(|o| self.position(&o.key))
                    .or_else(|| self.position(&new.key));

                let Some(index) = index else {
                    self.dropped_updates += 1;
                    let key = old.map(|o| o.key).unwrap_or(new.key);
                    return Err(Error::unknown_key(key));
                };

                if self.records[index].key == new.key {
                    self.records[index] = new;
                } else {
                    // Key changed: re-insert under the new key
                    self.records.remove(index);
                    self.upsert(new);
                }
            }

            LifecycleEvent::Deleted(record) => {
                if let Some(index) = self.position(&record.key) {
                    self.records.remove(index);
                } else {
                    trace!("Delete for unknown pod '{}' ignored", record.key);
                }
            }
        }

        self.clamp_cursor();
        Ok(())
    }

    /// Insert by key, replacing any record that already has it
    fn upsert(&mut self, record: Record) {
        match self.search(&record.key) {
            Ok(index) => self.records[index] = record,
            Err(index) => self.records.insert(index, record),
        }
    }

    fn search(&self, key: &str) -> std::result::Result<usize, usize> {
        self.records
            .binary_search_by(|r| r.key.as_str().cmp(key))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.search(key).ok()
    }

    // ─────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1).min(self.last_index());
    }

    pub fn cursor_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor = self.last_index();
    }

    fn last_index(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.last_index());
    }

    // ─────────────────────────────────────────────────────────
    // Feed state transitions
    // ─────────────────────────────────────────────────────────

    /// Idle → Watching. Returns false (and changes nothing) if a session is live.
    pub fn begin_watching(&mut self, session_id: FeedSessionId, source: &str) -> bool {
        if self.feed_state.is_active() {
            return false;
        }
        self.feed_state = FeedState::Watching;
        self.feed_session = Some(session_id);
        self.source_name = source.to_string();
        true
    }

    /// Watching → Stopping. Returns the session to stop, if one was watching.
    pub fn request_stop(&mut self) -> Option<FeedSessionId> {
        if self.feed_state != FeedState::Watching {
            return None;
        }
        self.feed_state = FeedState::Stopping;
        self.feed_session
    }

    /// Watching/Stopping → Idle for `session_id`.
    ///
    /// Returns false for stale sessions, leaving state untouched.
    pub fn end_feed(&mut self, session_id: FeedSessionId) -> bool {
        if self.feed_session != Some(session_id) {
            return false;
        }
        self.feed_state = FeedState::Idle;
        self.feed_session = None;
        true
    }

    // ─────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────

    pub fn set_quitting(&mut self) {
        self.quitting = true;
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}
