//! Signal preprocessing: smoothing and descriptive statistics

pub mod smoothing;
pub mod statistics;

pub use smoothing::{moving_average, MovingAverage};
pub use statistics::DescriptiveStatistics;
