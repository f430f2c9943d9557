//! podwatch-app - Application state and orchestration for podwatch
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state management:
//! the reconciler model, the update function, the event bridge that relays a watch
//! source into the engine, configuration loading and signal handling.

pub mod bridge;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod signals;
pub mod state;

// Re-export primary types
pub use bridge::EventBridge;
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppState, Notice, NoticeLevel, ViewSnapshot};
