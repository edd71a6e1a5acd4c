//! RSSI Tag Localization
//!
//! Estimates the 2D position of a mobile radio tag from received signal
//! strength observed at fixed anchors: RSSI smoothing and input
//! statistics, per-anchor path-loss calibration, distance estimation, and
//! iterative least-squares multilateration.

pub mod algorithms;
pub mod core;
pub mod pipeline;
pub mod processing;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use algorithms::{fit_quadratic, LogDistanceModel, MultilaterationSolver, RangeEstimator};
pub use crate::core::{
    Anchor, CalibrationPoint, DistanceModel, DistanceObservation, Point, PositionEstimate, Sample,
};
pub use pipeline::LocalizationPipeline;
pub use processing::{moving_average, DescriptiveStatistics};
pub use utils::{AnchorConfig, ConfigurationManager, SystemConfig};
pub use validation::PositioningError;
