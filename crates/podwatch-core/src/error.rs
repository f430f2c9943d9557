//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    #[error("Failed to restore terminal: {0}")]
    TerminalRestore(String),

    // ─────────────────────────────────────────────────────────────
    // Feed Errors
    // ─────────────────────────────────────────────────────────────
    #[error("A watch feed is already running")]
    AlreadyWatching,

    #[error("Watch feed terminated: {reason}")]
    FeedTerminated { reason: String },

    #[error("Update for unknown pod '{key}' dropped")]
    UnknownKeyOnModify { key: String },

    // ─────────────────────────────────────────────────────────────
    // Watch Source Errors
    // ─────────────────────────────────────────────────────────────
    #[error("kubectl not found. Ensure 'kubectl' is in your PATH or set feed.kubectl.")]
    KubectlNotFound,

    #[error("Failed to start watch source: {reason}")]
    SourceSpawn { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn feed_terminated(reason: impl Into<String>) -> Self {
        Self::FeedTerminated {
            reason: reason.into(),
        }
    }

    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKeyOnModify { key: key.into() }
    }

    pub fn source_spawn(reason: impl Into<String>) -> Self {
        Self::SourceSpawn {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AlreadyWatching
                | Error::FeedTerminated { .. }
                | Error::UnknownKeyOnModify { .. }
                | Error::SourceSpawn { .. }
                | Error::KubectlNotFound
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Terminal { .. }
                | Error::TerminalInit(_)
                | Error::TerminalRestore(_)
                | Error::ChannelClosed
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Log `context` alongside the error and convert it
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::feed_terminated("stream closed");
        assert_eq!(err.to_string(), "Watch feed terminated: stream closed");

        let err = Error::unknown_key("pod-x");
        assert!(err.to_string().contains("pod-x"));

        assert!(Error::KubectlNotFound.to_string().contains("kubectl"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_feed_errors_are_recoverable() {
        assert!(Error::AlreadyWatching.is_recoverable());
        assert!(Error::feed_terminated("eof").is_recoverable());
        assert!(Error::unknown_key("a").is_recoverable());
        assert!(!Error::AlreadyWatching.is_fatal());
    }

    #[test]
    fn test_terminal_errors_are_fatal() {
        assert!(Error::terminal("draw failed").is_fatal());
        assert!(Error::TerminalInit("no tty".into()).is_fatal());
        assert!(!Error::terminal("draw failed").is_recoverable());
    }

    #[test]
    fn test_closed_intake_is_fatal() {
        assert!(Error::ChannelClosed.is_fatal());
        assert!(!Error::ChannelClosed.is_recoverable());
    }

    #[test]
    fn test_source_errors_are_recoverable() {
        assert!(Error::KubectlNotFound.is_recoverable());
        assert!(Error::source_spawn("permission denied").is_recoverable());
        assert!(!Error::KubectlNotFound.is_fatal());
    }

    #[test]
    fn test_context_preserves_error_kind() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading config").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
