//! Configuration system for Ember.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap and hot-reload detection.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, SceneConfig, WindowConfig, default_config_dir};
pub use error::ConfigError;
