use crate::core::{Point, PositionEstimate, CONVERGENCE_THRESHOLD, MAX_ITERATIONS};
use crate::validation::PositioningError;
use nalgebra::Vector2;

/// Minimum number of anchor ranges for a determined 2D position
const MIN_OBSERVATIONS: usize = 3;

/// Iterative least-squares position solver
///
/// Given anchor coordinates and estimated distances to the same tag, finds
/// the point minimizing the sum of squared range residuals by gradient
/// descent. The residual is nonlinear in the position, so the solve
/// iterates from the anchor centroid (or a caller-supplied seed) until the
/// position update falls below `convergence_threshold` or `max_iterations`
/// is exhausted. Running out of iterations is not an error: the best
/// estimate seen is returned with `converged = false`.
///
/// Collinear anchor layouts leave one axis ill-conditioned. The solve still
/// terminates; callers should read a large residual as a sign of degenerate
/// geometry rather than expect a dedicated error.
#[derive(Debug, Clone)]
pub struct MultilaterationSolver {
    /// Gradient-descent step size
    pub step_size: f64,
    /// Update magnitude below which the solve is considered converged
    pub convergence_threshold: f64,
    /// Iteration cap
    pub max_iterations: usize,
}

impl Default for MultilaterationSolver {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            convergence_threshold: CONVERGENCE_THRESHOLD,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

impl MultilaterationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(
        step_size: f64,
        convergence_threshold: f64,
        max_iterations: usize,
    ) -> Self {
        Self {
            step_size,
            convergence_threshold,
            max_iterations,
        }
    }

    /// Solve for the tag position, seeding at the anchor centroid
    ///
    /// `ranges` pairs each anchor coordinate with its estimated distance to
    /// the tag. Fewer than 3 entries fail with
    /// [`PositioningError::UnderdeterminedPosition`].
    pub fn solve(&self, ranges: &[(Point, f64)]) -> Result<PositionEstimate, PositioningError> {
        let seed = centroid(ranges).ok_or(PositioningError::UnderdeterminedPosition {
            observations: ranges.len(),
            required: MIN_OBSERVATIONS,
        })?;
        self.solve_from(seed, ranges)
    }

    /// Solve for the tag position from a caller-supplied initial guess
    pub fn solve_from(
        &self,
        seed: Point,
        ranges: &[(Point, f64)],
    ) -> Result<PositionEstimate, PositioningError> {
        if ranges.len() < MIN_OBSERVATIONS {
            return Err(PositioningError::UnderdeterminedPosition {
                observations: ranges.len(),
                required: MIN_OBSERVATIONS,
            });
        }

        let mut estimate = Vector2::new(seed.x, seed.y);
        let mut best = estimate;
        let mut best_residual = residual_sum(&estimate, ranges);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let gradient = self.gradient(&estimate, ranges);
            let step = gradient * self.step_size;
            estimate -= step;
            iterations += 1;

            let residual = residual_sum(&estimate, ranges);
            if residual < best_residual {
                best_residual = residual;
                best = estimate;
            }

            if step.norm() < self.convergence_threshold {
                converged = true;
                break;
            }
        }

        Ok(PositionEstimate {
            position: Point::new(best.x, best.y),
            residual_sum_squares: best_residual,
            iterations,
            converged,
        })
    }

    /// Gradient of the squared-residual sum at the current estimate
    ///
    /// d/dx = sum 2 * (1 - d_i / r_i) * (x - x_i), symmetric in y, where
    /// r_i is the current range to anchor i. An anchor coincident with the
    /// estimate (r_i ~ 0) contributes nothing this step, avoiding the
    /// division by zero.
    fn gradient(&self, estimate: &Vector2<f64>, ranges: &[(Point, f64)]) -> Vector2<f64> {
        let mut gradient = Vector2::zeros();
        for (anchor, distance) in ranges {
            let offset = Vector2::new(estimate.x - anchor.x, estimate.y - anchor.y);
            let range = offset.norm();
            if range <= f64::EPSILON {
                continue;
            }
            gradient += offset * (2.0 * (1.0 - distance / range));
        }
        gradient
    }
}

/// Sum of squared range residuals at a candidate position
fn residual_sum(estimate: &Vector2<f64>, ranges: &[(Point, f64)]) -> f64 {
    ranges
        .iter()
        .map(|(anchor, distance)| {
            let range = Vector2::new(estimate.x - anchor.x, estimate.y - anchor.y).norm();
            let e = range - distance;
            e * e
        })
        .sum()
}

fn centroid(ranges: &[(Point, f64)]) -> Option<Point> {
    if ranges.is_empty() {
        return None;
    }
    let n = ranges.len() as f64;
    let x = ranges.iter().map(|(p, _)| p.x).sum::<f64>() / n;
    let y = ranges.iter().map(|(p, _)| p.y).sum::<f64>() / n;
    Some(Point::new(x, y))
}
