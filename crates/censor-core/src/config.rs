//! Censor configuration.

use prepcensor_common::{CensorError, CensorResult};
use prepcensor_confound_model::CensorSettings;

/// Which metrics are thresholded, and at what value.
///
/// There is no "none" variant: a configuration without any criterion is
/// rejected by [`Criteria::from_thresholds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criteria {
    /// Framewise displacement only.
    Fd(f64),
    /// DVARS only.
    Dvars(f64),
    /// Both metrics; a frame must pass each.
    Both { fd: f64, dvars: f64 },
}

impl Criteria {
    pub fn from_thresholds(fd: Option<f64>, dvars: Option<f64>) -> CensorResult<Self> {
        let criteria = match (fd, dvars) {
            (Some(fd), Some(dvars)) => Self::Both { fd, dvars },
            (Some(fd), None) => Self::Fd(fd),
            (None, Some(dvars)) => Self::Dvars(dvars),
            (None, None) => {
                return Err(CensorError::config(
                    "no censor criterion configured: set an FD and/or DVARS threshold",
                ))
            }
        };
        criteria.validate()?;
        Ok(criteria)
    }

    /// Reject non-finite thresholds. A `NaN` threshold would censor every
    /// frame, since no comparison against it holds.
    pub fn validate(&self) -> CensorResult<()> {
        for (name, value) in [("FD", self.fd_thresh()), ("DVARS", self.dvars_thresh())] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CensorError::config(format!(
                        "{name} threshold must be finite, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn fd_thresh(&self) -> Option<f64> {
        match *self {
            Self::Fd(fd) | Self::Both { fd, .. } => Some(fd),
            Self::Dvars(_) => None,
        }
    }

    pub fn dvars_thresh(&self) -> Option<f64> {
        match *self {
            Self::Dvars(dvars) | Self::Both { dvars, .. } => Some(dvars),
            Self::Fd(_) => None,
        }
    }
}

/// Immutable configuration for one censor computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub criteria: Criteria,

    /// Kept runs strictly shorter than this are censored.
    pub min_segment_length: Option<usize>,

    /// Widen each rejection to one frame before and two after.
    pub stringent: bool,
}

impl ThresholdConfig {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            min_segment_length: None,
            stringent: false,
        }
    }

    pub fn with_min_segment_length(mut self, min_segment_length: usize) -> Self {
        self.min_segment_length = Some(min_segment_length);
        self
    }

    pub fn with_stringent(mut self, stringent: bool) -> Self {
        self.stringent = stringent;
        self
    }

    /// Build and validate a configuration from loosely typed inputs.
    ///
    /// A segment length of zero disables pruning; negative lengths are a
    /// conversion error.
    pub fn from_raw(
        fd_thresh: Option<f64>,
        dvars_thresh: Option<f64>,
        segment: Option<i64>,
        stringent: bool,
    ) -> CensorResult<Self> {
        let criteria = Criteria::from_thresholds(fd_thresh, dvars_thresh)?;
        let min_segment_length = match segment {
            None | Some(0) => None,
            Some(n) if n < 0 => {
                return Err(CensorError::conversion(format!(
                    "segment length must be non-negative, got {n}"
                )))
            }
            Some(n) => Some(usize::try_from(n).map_err(|_| {
                CensorError::conversion(format!("segment length {n} is out of range"))
            })?),
        };

        Ok(Self {
            criteria,
            min_segment_length,
            stringent,
        })
    }

    /// The settings echoed into summaries.
    pub fn settings(&self) -> CensorSettings {
        CensorSettings {
            fd_thresh: self.criteria.fd_thresh(),
            dvars_thresh: self.criteria.dvars_thresh(),
            segment: self.min_segment_length,
            one_before_two_after: self.stringent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_criteria_is_config_error() {
        let err = Criteria::from_thresholds(None, None).unwrap_err();
        assert!(matches!(err, CensorError::Config { .. }));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        assert!(Criteria::from_thresholds(Some(f64::NAN), None).is_err());
        assert!(Criteria::from_thresholds(Some(0.5), Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_zero_threshold_is_a_real_criterion() {
        assert_eq!(Criteria::from_thresholds(Some(0.0), None).unwrap(), Criteria::Fd(0.0));
    }

    #[test]
    fn test_from_raw_segment_handling() {
        let config = ThresholdConfig::from_raw(Some(0.5), None, Some(0), false).unwrap();
        assert_eq!(config.min_segment_length, None);

        let config = ThresholdConfig::from_raw(Some(0.5), Some(1.5), Some(5), true).unwrap();
        assert_eq!(config.min_segment_length, Some(5));
        assert_eq!(config.criteria, Criteria::Both { fd: 0.5, dvars: 1.5 });

        let err = ThresholdConfig::from_raw(Some(0.5), None, Some(-3), false).unwrap_err();
        assert!(matches!(err, CensorError::Conversion { .. }));
    }

    #[test]
    fn test_settings_echo() {
        let settings = ThresholdConfig::new(Criteria::Dvars(1.5))
            .with_min_segment_length(4)
            .with_stringent(true)
            .settings();
        assert_eq!(settings.fd_thresh, None);
        assert_eq!(settings.dvars_thresh, Some(1.5));
        assert_eq!(settings.segment, Some(4));
        assert!(settings.one_before_two_after);
    }
}
