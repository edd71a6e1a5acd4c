//! Localization algorithms: calibration, path-loss ranging, multilateration

pub mod calibration;
pub mod multilateration;
pub mod path_loss;

pub use calibration::fit_quadratic;
pub use multilateration::MultilaterationSolver;
pub use path_loss::{LogDistanceModel, RangeEstimator};
