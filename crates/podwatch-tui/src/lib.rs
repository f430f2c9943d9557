//! podwatch-tui - Terminal UI for podwatch
//!
//! This crate provides the ratatui-based terminal interface. It creates an Engine
//! from podwatch-app and adds terminal rendering, input polling and the
//! controller loop.

pub mod event;
pub mod render;
pub mod runner;
pub mod terminal;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use render::{render, status_line, view};
pub use runner::run;
