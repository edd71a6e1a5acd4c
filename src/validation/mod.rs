//! Error types shared across the localization pipeline

pub mod error;

pub use error::PositioningError;
