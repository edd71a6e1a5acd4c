use crate::core::{CalibrationPoint, DistanceModel};
use crate::validation::PositioningError;
use nalgebra::{Matrix3, Vector3};

/// Minimum number of distinct RSSI values for a well-determined quadratic fit
const MIN_DISTINCT_RSSI: usize = 3;

/// Fit the least-squares quadratic `distance = a*rssi^2 + b*rssi + c`
/// over one anchor's calibration set
///
/// Solves the 3x3 normal equations of the Vandermonde system. The returned
/// model carries the residual sum of squares; no acceptance threshold is
/// imposed here, callers decide what counts as a usable calibration.
///
/// Fails with [`PositioningError::UnderdeterminedFit`] when fewer than 3
/// distinct RSSI values are present, and with
/// [`PositioningError::NumericDegeneracy`] when the normal matrix is
/// singular.
pub fn fit_quadratic(points: &[CalibrationPoint]) -> Result<DistanceModel, PositioningError> {
    let distinct = count_distinct_rssi(points);
    if distinct < MIN_DISTINCT_RSSI {
        return Err(PositioningError::UnderdeterminedFit {
            distinct_rssi_values: distinct,
            required: MIN_DISTINCT_RSSI,
        });
    }

    // Accumulate X^T X and X^T y for the basis [rssi^2, rssi, 1]
    let mut s0 = 0.0; // sum 1
    let mut s1 = 0.0; // sum r
    let mut s2 = 0.0; // sum r^2
    let mut s3 = 0.0; // sum r^3
    let mut s4 = 0.0; // sum r^4
    let mut t0 = 0.0; // sum d
    let mut t1 = 0.0; // sum d*r
    let mut t2 = 0.0; // sum d*r^2

    for p in points {
        let r = p.rssi;
        let r2 = r * r;
        s0 += 1.0;
        s1 += r;
        s2 += r2;
        s3 += r2 * r;
        s4 += r2 * r2;
        t0 += p.true_distance;
        t1 += p.true_distance * r;
        t2 += p.true_distance * r2;
    }

    let normal = Matrix3::new(s4, s3, s2, s3, s2, s1, s2, s1, s0);
    let rhs = Vector3::new(t2, t1, t0);

    let coeffs = normal
        .lu()
        .solve(&rhs)
        .ok_or_else(|| PositioningError::NumericDegeneracy {
            operation: "quadratic calibration normal equations".to_string(),
        })?;

    let (a, b, c) = (coeffs[0], coeffs[1], coeffs[2]);

    let residual_sum_squares = points
        .iter()
        .map(|p| {
            let predicted = a * p.rssi * p.rssi + b * p.rssi + c;
            let e = predicted - p.true_distance;
            e * e
        })
        .sum();

    Ok(DistanceModel::new(a, b, c, residual_sum_squares))
}

fn count_distinct_rssi(points: &[CalibrationPoint]) -> usize {
    let mut seen: Vec<f64> = Vec::with_capacity(points.len());
    for p in points {
        if !seen.iter().any(|&r| r == p.rssi) {
            seen.push(p.rssi);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_points(a: f64, b: f64, c: f64, rssi_values: &[f64]) -> Vec<CalibrationPoint> {
        rssi_values
            .iter()
            .map(|&r| CalibrationPoint::new(a * r * r + b * r + c, r))
            .collect()
    }

    #[test]
    fn test_exact_fit_roundtrip() {
        let (a, b, c) = (0.002, -0.35, 1.8);
        let points = synthetic_points(a, b, c, &[-70.0, -65.0, -60.0, -55.0, -50.0, -45.0]);

        let model = fit_quadratic(&points).unwrap();
        assert!((model.a - a).abs() < 1e-6);
        assert!((model.b - b).abs() < 1e-6);
        assert!((model.c - c).abs() < 1e-6);
        assert!(model.residual_sum_squares < 1e-9);
    }

    #[test]
    fn test_minimal_three_point_fit() {
        let points = synthetic_points(0.01, -0.2, 0.5, &[-60.0, -50.0, -40.0]);
        let model = fit_quadratic(&points).unwrap();
        assert!((model.a - 0.01).abs() < 1e-6);
        assert!((model.b + 0.2).abs() < 1e-6);
        assert!((model.c - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let points = synthetic_points(0.005, -0.4, 2.0, &[-68.0, -61.0, -54.0, -47.0]);
        let first = fit_quadratic(&points).unwrap();
        let second = fit_quadratic(&points).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_noisy_fit_reports_residual() {
        let mut points = synthetic_points(0.002, -0.3, 1.0, &[-70.0, -60.0, -50.0, -40.0]);
        points[1].true_distance += 0.5;

        let model = fit_quadratic(&points).unwrap();
        assert!(model.residual_sum_squares > 0.0);
    }

    #[test]
    fn test_two_distinct_rssi_rejected() {
        // Four points but only two distinct RSSI values
        let points = vec![
            CalibrationPoint::new(1.0, -50.0),
            CalibrationPoint::new(1.1, -50.0),
            CalibrationPoint::new(2.0, -60.0),
            CalibrationPoint::new(2.1, -60.0),
        ];
        assert_eq!(
            fit_quadratic(&points).unwrap_err(),
            PositioningError::UnderdeterminedFit {
                distinct_rssi_values: 2,
                required: 3,
            }
        );
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            fit_quadratic(&[]),
            Err(PositioningError::UnderdeterminedFit {
                distinct_rssi_values: 0,
                ..
            })
        ));
    }
}
