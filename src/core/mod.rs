//! Core types and constants for RSSI-based tag localization

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
