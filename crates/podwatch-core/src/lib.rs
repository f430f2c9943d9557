//! # podwatch-core - Core Domain Types
//!
//! Foundation crate for podwatch. Provides the record and lifecycle event
//! types shared by every other crate, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde_json, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Record`] - One tracked pod as displayed (key, status, age)
//! - [`FeedState`] - Whether a watch feed is live (Idle, Watching, Stopping)
//! - [`FeedSessionId`] - Identifier of one feed subscription
//!
//! ### Events (`events`)
//! - [`LifecycleEvent`] - Added / Modified / Deleted, as delivered to the model
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use podwatch_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all podwatch crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::LifecycleEvent;
pub use types::{next_feed_session_id, FeedSessionId, FeedState, Record};
