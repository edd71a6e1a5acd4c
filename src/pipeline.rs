use crate::algorithms::{LogDistanceModel, MultilaterationSolver, RangeEstimator};
use crate::core::{Anchor, DistanceObservation, PositionEstimate, Sample};
use crate::utils::ConfigurationManager;
use crate::validation::PositioningError;

/// End-to-end localization: per-anchor ranging followed by a position solve
///
/// Owns the anchor table, the uncalibrated fallback model, and a solver.
/// Each anchor ranges with its own calibrated model when it has one and
/// falls back to the log-distance model otherwise. The pipeline is pure:
/// reading samples from hardware and reporting estimates are collaborator
/// concerns.
pub struct LocalizationPipeline {
    anchors: Vec<Anchor>,
    fallback: LogDistanceModel,
    solver: MultilaterationSolver,
}

impl LocalizationPipeline {
    pub fn new(
        anchors: Vec<Anchor>,
        fallback: LogDistanceModel,
        solver: MultilaterationSolver,
    ) -> Self {
        Self {
            anchors,
            fallback,
            solver,
        }
    }

    /// Assemble a pipeline from a validated configuration
    pub fn from_config(config: &ConfigurationManager) -> Self {
        Self::new(config.anchors(), config.fallback_model(), config.solver())
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Convert one sample into a distance observation
    ///
    /// Returns `None` when the sample names an anchor this pipeline does
    /// not know about.
    pub fn observe(&self, sample: &Sample) -> Option<DistanceObservation> {
        let anchor = self.anchors.iter().find(|a| a.id == sample.anchor_id)?;
        Some(DistanceObservation {
            anchor_id: anchor.id.clone(),
            distance: self.estimate_distance(anchor, sample.rssi),
            timestamp_ms: sample.timestamp_ms,
        })
    }

    /// Range one anchor: calibrated model when present, fallback otherwise
    pub fn estimate_distance(&self, anchor: &Anchor, rssi: f64) -> f64 {
        match &anchor.model {
            Some(model) => model.distance_from_rssi(rssi),
            None => self.fallback.distance_from_rssi(rssi),
        }
    }

    /// Estimate the tag position from one sample per anchor
    ///
    /// Samples naming unknown anchors do not count toward the solve; fewer
    /// than 3 usable observations fail with
    /// [`PositioningError::UnderdeterminedPosition`].
    pub fn locate(&self, samples: &[Sample]) -> Result<PositionEstimate, PositioningError> {
        let ranges: Vec<_> = samples
            .iter()
            .filter_map(|sample| {
                self.anchors
                    .iter()
                    .find(|a| a.id == sample.anchor_id)
                    .map(|anchor| (anchor.position, self.estimate_distance(anchor, sample.rssi)))
            })
            .collect();
        self.solver.solve(&ranges)
    }

    /// Estimate the tag position from pre-computed distance observations
    pub fn locate_from_distances(
        &self,
        observations: &[DistanceObservation],
    ) -> Result<PositionEstimate, PositioningError> {
        let ranges: Vec<_> = observations
            .iter()
            .filter_map(|obs| {
                self.anchors
                    .iter()
                    .find(|a| a.id == obs.anchor_id)
                    .map(|anchor| (anchor.position, obs.distance))
            })
            .collect();
        self.solver.solve(&ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;

    /// Anchors from the reference scenario, uncalibrated
    fn test_anchors() -> Vec<Anchor> {
        vec![
            Anchor::new("A1", Point::new(3.0, 4.0)),
            Anchor::new("A2", Point::new(9.0, 1.0)),
            Anchor::new("A3", Point::new(9.0, 7.0)),
        ]
    }

    /// RSSI that makes the default log-distance model report `distance`
    fn rssi_for_distance(model: &LogDistanceModel, distance: f64) -> f64 {
        model.reference_rssi - 10.0 * model.path_loss_exponent * distance.log10()
    }

    fn sample(anchor_id: &str, rssi: f64) -> Sample {
        Sample {
            anchor_id: anchor_id.to_string(),
            timestamp_ms: 0,
            rssi,
            tag_id: Some("TAG-1".to_string()),
        }
    }

    #[test]
    fn test_locate_reference_scenario() {
        let fallback = LogDistanceModel::default();
        let tag = Point::new(6.0, 4.0);
        let anchors = test_anchors();

        let samples: Vec<Sample> = anchors
            .iter()
            .map(|a| {
                let d = a.position.distance_to(&tag);
                sample(&a.id, rssi_for_distance(&fallback, d))
            })
            .collect();

        let pipeline =
            LocalizationPipeline::new(anchors, fallback, MultilaterationSolver::new());
        let estimate = pipeline.locate(&samples).unwrap();

        assert!(estimate.converged);
        assert!(estimate.position.distance_to(&tag) < 0.01);
    }

    #[test]
    fn test_calibrated_anchor_uses_own_model() {
        let fallback = LogDistanceModel::default();
        // Constant model: always reports 2.5 regardless of RSSI
        let calibrated = crate::core::DistanceModel::new(0.0, 0.0, 2.5, 0.0);
        let anchors = vec![test_anchors()[0].with_model(calibrated)];

        let pipeline =
            LocalizationPipeline::new(anchors, fallback, MultilaterationSolver::new());
        let obs = pipeline.observe(&sample("A1", -80.0)).unwrap();
        assert!((obs.distance - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_uncalibrated_anchor_uses_fallback() {
        let fallback = LogDistanceModel::default();
        let pipeline = LocalizationPipeline::new(
            test_anchors(),
            fallback,
            MultilaterationSolver::new(),
        );
        let obs = pipeline.observe(&sample("A2", -50.0)).unwrap();
        assert!((obs.distance - fallback.distance_from_rssi(-50.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_anchor_yields_no_observation() {
        let pipeline = LocalizationPipeline::new(
            test_anchors(),
            LogDistanceModel::default(),
            MultilaterationSolver::new(),
        );
        assert!(pipeline.observe(&sample("A9", -50.0)).is_none());
    }

    #[test]
    fn test_too_few_usable_samples_rejected() {
        let pipeline = LocalizationPipeline::new(
            test_anchors(),
            LogDistanceModel::default(),
            MultilaterationSolver::new(),
        );
        // Only two samples name known anchors
        let samples = vec![
            sample("A1", -50.0),
            sample("A2", -55.0),
            sample("UNKNOWN", -60.0),
        ];
        assert_eq!(
            pipeline.locate(&samples).unwrap_err(),
            PositioningError::UnderdeterminedPosition {
                observations: 2,
                required: 3,
            }
        );
    }

    #[test]
    fn test_locate_from_distances_matches_locate() {
        let fallback = LogDistanceModel::default();
        let tag = Point::new(6.0, 4.0);
        let anchors = test_anchors();

        let samples: Vec<Sample> = anchors
            .iter()
            .map(|a| {
                let d = a.position.distance_to(&tag);
                sample(&a.id, rssi_for_distance(&fallback, d))
            })
            .collect();

        let pipeline =
            LocalizationPipeline::new(anchors, fallback, MultilaterationSolver::new());
        let observations: Vec<DistanceObservation> = samples
            .iter()
            .map(|s| pipeline.observe(s).unwrap())
            .collect();

        let direct = pipeline.locate(&samples).unwrap();
        let via_obs = pipeline.locate_from_distances(&observations).unwrap();
        assert!(direct.position.distance_to(&via_obs.position) < 1e-9);
    }
}
