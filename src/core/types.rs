//! Core data types for the localization system

use serde::{Deserialize, Serialize};

/// 2D coordinate in the local anchor frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Fixed radio anchor (reader antenna) at a known coordinate
///
/// Anchors are configured once at setup and never mutated. Re-fitting a
/// calibration model produces a new `Anchor` via [`Anchor::with_model`];
/// the old model is replaced wholesale, never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    pub position: Point,
    /// Calibrated RSSI-to-distance model, if this anchor has been calibrated
    pub model: Option<DistanceModel>,
}

impl Anchor {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
            model: None,
        }
    }

    /// Returns a copy of this anchor with the given calibration model attached
    pub fn with_model(&self, model: DistanceModel) -> Self {
        Self {
            id: self.id.clone(),
            position: self.position,
            model: Some(model),
        }
    }
}

/// One raw RSSI observation from a reader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub anchor_id: String,
    /// Milliseconds since an arbitrary epoch, assigned by the ingestion layer
    pub timestamp_ms: u64,
    /// Received signal strength in dBm
    pub rssi: f64,
    pub tag_id: Option<String>,
}

/// Labeled calibration observation: RSSI measured at a known distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    pub true_distance: f64,
    pub rssi: f64,
}

impl CalibrationPoint {
    pub fn new(true_distance: f64, rssi: f64) -> Self {
        Self {
            true_distance,
            rssi,
        }
    }
}

/// Quadratic RSSI-to-distance model for one anchor
///
/// Evaluates `a * rssi^2 + b * rssi + c`. Produced by the calibrator;
/// immutable once fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Residual sum of squares over the calibration set, so callers can
    /// judge fit quality against their own acceptance policy
    pub residual_sum_squares: f64,
}

impl DistanceModel {
    pub fn new(a: f64, b: f64, c: f64, residual_sum_squares: f64) -> Self {
        Self {
            a,
            b,
            c,
            residual_sum_squares,
        }
    }
}

/// Per-anchor distance estimate derived from a single RSSI reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceObservation {
    pub anchor_id: String,
    pub distance: f64,
    pub timestamp_ms: u64,
}

/// Output of the multilateration solver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionEstimate {
    pub position: Point,
    /// Sum of squared range residuals at the returned position
    pub residual_sum_squares: f64,
    /// Iterations actually used
    pub iterations: usize,
    /// False when the solver hit its iteration cap before the update
    /// magnitude dropped below the convergence threshold. The estimate is
    /// still the best one found.
    pub converged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_anchor_model_replacement() {
        let anchor = Anchor::new("A1", Point::new(1.0, 2.0));
        assert!(anchor.model.is_none());

        let fitted = anchor.with_model(DistanceModel::new(0.01, -0.5, 2.0, 0.0));
        assert!(fitted.model.is_some());
        assert_eq!(fitted.id, "A1");
        // The original anchor is untouched
        assert!(anchor.model.is_none());
    }
}
