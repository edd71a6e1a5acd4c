//! Configuration loading and validation

pub mod config;

pub use config::{AnchorConfig, ConfigError, ConfigurationManager, SystemConfig};
