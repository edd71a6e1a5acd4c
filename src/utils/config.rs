use crate::algorithms::{LogDistanceModel, MultilaterationSolver};
use crate::core::{
    Anchor, DistanceModel, Point, CONVERGENCE_THRESHOLD, DEFAULT_SMOOTHING_WINDOW,
    MAX_ITERATIONS, PATH_LOSS_EXPONENT, REFERENCE_RSSI,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// System-wide tunables, supplied once at setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Gradient-descent step size for the solver
    pub step_size: f64,
    /// Solver convergence threshold (position units)
    pub convergence_threshold: f64,
    /// Solver iteration cap
    pub max_iterations: usize,
    /// Expected RSSI (dBm) at 1 unit of distance, for the fallback model
    pub reference_rssi: f64,
    /// Path-loss exponent for the fallback model
    pub path_loss_exponent: f64,
    /// Rolling-mean window for RSSI smoothing
    pub smoothing_window: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            convergence_threshold: CONVERGENCE_THRESHOLD,
            max_iterations: MAX_ITERATIONS,
            reference_rssi: REFERENCE_RSSI,
            path_loss_exponent: PATH_LOSS_EXPONENT,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

/// One anchor entry in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Pre-fitted quadratic model, when a calibration run already produced one
    pub model: Option<DistanceModel>,
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    DuplicateAnchor {
        anchor_id: String,
    },
    IoError {
        message: String,
    },
    SerializationError {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => write!(f, "invalid parameter '{}' = '{}': {}", parameter, value, reason),
            ConfigError::DuplicateAnchor { anchor_id } => {
                write!(f, "duplicate anchor id '{}'", anchor_id)
            }
            ConfigError::IoError { message } => write!(f, "I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Outcome of a validation pass: hard errors plus advisory warnings
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

/// On-disk configuration file layout
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFileData {
    system: SystemConfig,
    anchors: Vec<AnchorConfig>,
}

/// Holds the validated system configuration and anchor table, and builds
/// the algorithm objects from them
pub struct ConfigurationManager {
    system: SystemConfig,
    anchors: Vec<AnchorConfig>,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self {
            system: SystemConfig::default(),
            anchors: Vec::new(),
        }
    }

    /// Build from in-memory parts, validating before accepting
    pub fn with_config(
        system: SystemConfig,
        anchors: Vec<AnchorConfig>,
    ) -> Result<Self, ConfigError> {
        let manager = Self { system, anchors };
        let validation = manager.validate();
        if let Some(first) = validation.errors.into_iter().next() {
            return Err(first);
        }
        Ok(manager)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;
        let data: ConfigFileData =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to parse config file '{}': {}", path_str, e),
            })?;
        Self::with_config(data.system, data.anchors)
    }

    /// Write the current configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let data = ConfigFileData {
            system: self.system.clone(),
            anchors: self.anchors.clone(),
        };
        let content =
            serde_json::to_string_pretty(&data).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to serialize config: {}", e),
            })?;
        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!(
                "failed to write config file '{}': {}",
                path.as_ref().to_string_lossy(),
                e
            ),
        })
    }

    pub fn system(&self) -> &SystemConfig {
        &self.system
    }

    /// Materialize the anchor table, attaching any configured models
    pub fn anchors(&self) -> Vec<Anchor> {
        self.anchors
            .iter()
            .map(|a| Anchor {
                id: a.id.clone(),
                position: Point::new(a.x, a.y),
                model: a.model,
            })
            .collect()
    }

    /// Build a solver from the configured tunables
    pub fn solver(&self) -> MultilaterationSolver {
        MultilaterationSolver::with_parameters(
            self.system.step_size,
            self.system.convergence_threshold,
            self.system.max_iterations,
        )
    }

    /// Build the uncalibrated fallback model from the configured tunables
    pub fn fallback_model(&self) -> LogDistanceModel {
        LogDistanceModel::new(self.system.reference_rssi, self.system.path_loss_exponent)
    }

    /// Validate tunables and anchor table
    ///
    /// Collinear anchor layouts are a warning, not an error: the solver
    /// still terminates on them, it just cannot resolve one axis well.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.system.step_size <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "step_size".to_string(),
                value: self.system.step_size.to_string(),
                reason: "step size must be positive".to_string(),
            });
        }
        if self.system.convergence_threshold <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "convergence_threshold".to_string(),
                value: self.system.convergence_threshold.to_string(),
                reason: "convergence threshold must be positive".to_string(),
            });
        }
        if self.system.max_iterations == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "max_iterations".to_string(),
                value: "0".to_string(),
                reason: "at least one iteration is required".to_string(),
            });
        }
        if self.system.path_loss_exponent <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "path_loss_exponent".to_string(),
                value: self.system.path_loss_exponent.to_string(),
                reason: "path-loss exponent must be positive".to_string(),
            });
        }
        if self.system.smoothing_window == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "smoothing_window".to_string(),
                value: "0".to_string(),
                reason: "smoothing window must be at least 1".to_string(),
            });
        }

        for (i, anchor) in self.anchors.iter().enumerate() {
            if anchor.id.is_empty() {
                errors.push(ConfigError::InvalidParameter {
                    parameter: format!("anchors[{}].id", i),
                    value: String::new(),
                    reason: "anchor id must not be empty".to_string(),
                });
            }
            if self.anchors[..i].iter().any(|other| other.id == anchor.id) {
                errors.push(ConfigError::DuplicateAnchor {
                    anchor_id: anchor.id.clone(),
                });
            }
        }

        if self.anchors.len() >= 3 && anchors_collinear(&self.anchors) {
            warnings.push(
                "configured anchors are collinear; position fixes will be ill-conditioned \
                 across that line"
                    .to_string(),
            );
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// True when every configured anchor lies on one line (cross products
/// against the first segment all vanish)
fn anchors_collinear(anchors: &[AnchorConfig]) -> bool {
    let (x0, y0) = (anchors[0].x, anchors[0].y);
    let reference = anchors[1..]
        .iter()
        .find(|a| (a.x - x0).abs() > 1e-9 || (a.y - y0).abs() > 1e-9);
    let Some(reference) = reference else {
        // All anchors coincide
        return true;
    };
    let (dx, dy) = (reference.x - x0, reference.y - y0);
    anchors.iter().all(|a| {
        let cross = (a.x - x0) * dy - (a.y - y0) * dx;
        cross.abs() < 1e-9
    })
}
