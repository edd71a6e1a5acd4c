//! Physical constants and system parameters

/// Expected RSSI (dBm) at the reference distance of 1 unit from an anchor
pub const REFERENCE_RSSI: f64 = -30.0;

/// Path-loss exponent for the log-distance fallback model (2.0 = free space)
pub const PATH_LOSS_EXPONENT: f64 = 2.0;

/// Position-update magnitude below which the solver is considered converged
pub const CONVERGENCE_THRESHOLD: f64 = 0.001;

/// Iteration cap for the multilateration solver
pub const MAX_ITERATIONS: usize = 10_000;

/// Default rolling-mean window for RSSI smoothing
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;
