//! Per-timepoint confound samples.

/// Column holding framewise displacement in fMRIPrep confound tables.
pub const FRAMEWISE_DISPLACEMENT: &str = "framewise_displacement";

/// Column holding DVARS in fMRIPrep confound tables.
pub const DVARS: &str = "dvars";

/// An ordered sequence of samples, one per timepoint.
///
/// Missing values are stored as `NaN`; the first frame of motion metrics is
/// typically missing because it has no prior frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeseries {
    samples: Vec<f64>,
}

impl Timeseries {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Raw samples, including any `NaN`.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Samples with every missing value replaced by `0.0`.
    pub fn filled(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|&v| if v.is_nan() { 0.0 } else { v })
            .collect()
    }

    /// Mean over the filled samples, so missing frames count as zero.
    pub fn filled_mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.filled().iter().sum();
        Some(sum / self.samples.len() as f64)
    }
}

impl From<Vec<f64>> for Timeseries {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_replaces_nan() {
        let ts = Timeseries::new(vec![f64::NAN, 0.2, f64::NAN, 0.4]);
        assert_eq!(ts.filled(), vec![0.0, 0.2, 0.0, 0.4]);
        assert!(ts.samples()[0].is_nan());
    }

    #[test]
    fn test_filled_mean_counts_missing_as_zero() {
        let ts = Timeseries::new(vec![f64::NAN, 0.3, 0.3, 0.6]);
        assert!((ts.filled_mean().unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(Timeseries::default().filled_mean(), None);
    }
}
