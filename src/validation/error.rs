use serde::{Deserialize, Serialize};
use std::fmt;

/// Error classification for the localization core
///
/// Every variant is recoverable at the call site: calibration and solver
/// calls return these rather than terminating, and no operation substitutes
/// a default value for missing data. A solver that runs out of iterations
/// is not an error; it returns its best estimate with
/// `PositionEstimate::converged == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositioningError {
    /// Too few samples for the requested operation (empty batch, or a
    /// smoothing window longer than the series)
    InsufficientData { available: usize, required: usize },

    /// Fewer than 3 distinct RSSI values supplied to the quadratic
    /// calibrator, leaving the fit under-determined
    UnderdeterminedFit {
        distinct_rssi_values: usize,
        required: usize,
    },

    /// Fewer than 3 anchor distance observations supplied to the solver
    UnderdeterminedPosition {
        observations: usize,
        required: usize,
    },

    /// A linear solve hit a singular or near-singular matrix
    NumericDegeneracy { operation: String },
}

impl fmt::Display for PositioningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositioningError::InsufficientData {
                available,
                required,
            } => {
                write!(
                    f,
                    "insufficient data: {} samples available, {} required",
                    available, required
                )
            }
            PositioningError::UnderdeterminedFit {
                distinct_rssi_values,
                required,
            } => {
                write!(
                    f,
                    "under-determined fit: {} distinct RSSI values, {} required",
                    distinct_rssi_values, required
                )
            }
            PositioningError::UnderdeterminedPosition {
                observations,
                required,
            } => {
                write!(
                    f,
                    "under-determined position: {} distance observations, {} required",
                    observations, required
                )
            }
            PositioningError::NumericDegeneracy { operation } => {
                write!(f, "numeric degeneracy in {}", operation)
            }
        }
    }
}

impl std::error::Error for PositioningError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PositioningError::UnderdeterminedPosition {
            observations: 2,
            required: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 distance observations"));
        assert!(msg.contains("3 required"));
    }
}
