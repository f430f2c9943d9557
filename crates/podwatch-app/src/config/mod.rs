//! Configuration file parsing for podwatch
//!
//! Supports:
//! - `<config dir>/podwatch/config.toml` - Global settings
//! - `--config <path>` - An explicit settings file

pub mod settings;
pub mod types;

pub use settings::{default_config_path, init_config_file, load_settings, CONFIG_FILENAME};
pub use types::*;
