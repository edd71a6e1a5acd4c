use crate::core::{DistanceModel, PATH_LOSS_EXPONENT, REFERENCE_RSSI};
use serde::{Deserialize, Serialize};

/// The single ranging capability: turn one RSSI reading into a distance
///
/// Implementations are pure functions of their parameters; identical
/// inputs always produce identical outputs.
pub trait RangeEstimator {
    fn distance_from_rssi(&self, rssi: f64) -> f64;
}

/// Calibrated mode: evaluate the fitted quadratic
///
/// No validity clamping is applied here; a caller that wants non-negative
/// distances clamps at the presentation layer.
impl RangeEstimator for DistanceModel {
    fn distance_from_rssi(&self, rssi: f64) -> f64 {
        self.a * rssi * rssi + self.b * rssi + self.c
    }
}

/// Log-distance path-loss model, the fallback before any calibration exists
///
/// `d = 10^((RSSI_0 - rssi) / (10 * n))` where `RSSI_0` is the expected
/// signal strength at 1 unit of distance and `n` the path-loss exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogDistanceModel {
    /// Expected RSSI (dBm) at the reference distance of 1 unit
    pub reference_rssi: f64,
    /// Path-loss exponent (2.0 in free space, higher indoors)
    pub path_loss_exponent: f64,
}

impl LogDistanceModel {
    pub fn new(reference_rssi: f64, path_loss_exponent: f64) -> Self {
        Self {
            reference_rssi,
            path_loss_exponent,
        }
    }
}

impl Default for LogDistanceModel {
    fn default() -> Self {
        Self::new(REFERENCE_RSSI, PATH_LOSS_EXPONENT)
    }
}

impl RangeEstimator for LogDistanceModel {
    fn distance_from_rssi(&self, rssi: f64) -> f64 {
        10f64.powf((self.reference_rssi - rssi) / (10.0 * self.path_loss_exponent))
    }
}
