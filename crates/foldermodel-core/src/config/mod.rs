//! Configuration management.
//!
//! [`settings::Config`] is stored as TOML and loaded at startup.

pub mod settings;

pub use settings::{Config, LogConfig, ModelConfig, WatcherConfig};
