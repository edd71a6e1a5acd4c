use crate::validation::PositioningError;
use serde::{Deserialize, Serialize};

/// Descriptive statistics over a finite batch of raw RSSI values
///
/// Used to judge calibration input quality before fitting. Variance,
/// skewness and excess kurtosis use population (n-denominator)
/// conventions; percentiles interpolate linearly between closest ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub median: f64,
    pub percentile_25: f64,
    pub percentile_50: f64,
    pub percentile_75: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    /// max - min
    pub peak_to_peak: f64,
}

impl DescriptiveStatistics {
    /// Compute statistics over the raw (unsmoothed) values
    ///
    /// Fails with [`PositioningError::InsufficientData`] on an empty batch.
    pub fn from_samples(values: &[f64]) -> Result<Self, PositioningError> {
        if values.is_empty() {
            return Err(PositioningError::InsufficientData {
                available: 0,
                required: 1,
            });
        }

        let count = values.len();
        let n = count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let min = sorted[0];
        let max = sorted[count - 1];
        let mean = values.iter().sum::<f64>() / n;

        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        for v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        m2 /= n;
        m3 /= n;
        m4 /= n;

        let variance = m2;
        let std_dev = variance.sqrt();

        // Constant series: zero spread, moments are defined as zero
        let (skewness, excess_kurtosis) = if std_dev > 0.0 {
            (m3 / std_dev.powi(3), m4 / (variance * variance) - 3.0)
        } else {
            (0.0, 0.0)
        };

        let percentile_25 = percentile_sorted(&sorted, 25.0);
        let percentile_50 = percentile_sorted(&sorted, 50.0);
        let percentile_75 = percentile_sorted(&sorted, 75.0);

        Ok(Self {
            count,
            min,
            max,
            mean,
            variance,
            std_dev,
            median: percentile_50,
            percentile_25,
            percentile_50,
            percentile_75,
            skewness,
            excess_kurtosis,
            peak_to_peak: max - min,
        })
    }
}

/// Percentile of an ascending-sorted slice, interpolating between ranks
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
