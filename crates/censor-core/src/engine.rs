//! The censor engine: confound timeseries in, keep/censor mask out.
//!
//! # Algorithm
//!
//! 1. **Threshold** each configured metric: keep frames with `value <= threshold`.
//! 2. **Widen** each metric's rejections when stringent mode is on.
//! 3. **Combine** metrics with a logical AND.
//! 4. **Prune** kept segments shorter than the minimum length.
//! 5. **Summarize** counts, censored fraction, mean FD, and the settings used.

use prepcensor_common::{CensorError, CensorResult};
use prepcensor_confound_model::{CensorMask, CensorSummary, Timeseries, DVARS, FRAMEWISE_DISPLACEMENT};

use crate::config::{Criteria, ThresholdConfig};
use crate::segment::prune_short_segments;
use crate::threshold::{intersect, threshold_keep, widen_stringent};

/// Mask and summary for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CensorOutcome {
    pub mask: CensorMask,
    pub summary: CensorSummary,
}

impl CensorOutcome {
    pub fn into_parts(self) -> (CensorMask, CensorSummary) {
        (self.mask, self.summary)
    }
}

/// Computes censor masks for a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct CensorEngine {
    config: ThresholdConfig,
}

impl CensorEngine {
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Censor one run.
    ///
    /// Each configured criterion needs its timeseries; all supplied series
    /// must share one non-zero length. `meanFD` is reported whenever an FD
    /// series is supplied.
    pub fn compute(
        &self,
        fd: Option<&Timeseries>,
        dvars: Option<&Timeseries>,
    ) -> CensorResult<CensorOutcome> {
        self.config.criteria.validate()?;
        check_lengths(fd, dvars)?;

        let mut keep = match self.config.criteria {
            Criteria::Fd(t) => self.criterion_keep(fd, FRAMEWISE_DISPLACEMENT, t)?,
            Criteria::Dvars(t) => self.criterion_keep(dvars, DVARS, t)?,
            Criteria::Both {
                fd: fd_t,
                dvars: dvars_t,
            } => {
                let fd_keep = self.criterion_keep(fd, FRAMEWISE_DISPLACEMENT, fd_t)?;
                let dvars_keep = self.criterion_keep(dvars, DVARS, dvars_t)?;
                intersect(&fd_keep, &dvars_keep)
            }
        };

        if let Some(min_len) = self.config.min_segment_length {
            prune_short_segments(&mut keep, min_len);
        }

        let mask = CensorMask::new(keep);
        let summary = CensorSummary::from_mask(
            &mask,
            fd.and_then(Timeseries::filled_mean),
            self.config.settings(),
        );

        Ok(CensorOutcome { mask, summary })
    }

    fn criterion_keep(
        &self,
        series: Option<&Timeseries>,
        name: &str,
        threshold: f64,
    ) -> CensorResult<Vec<bool>> {
        let series = series.ok_or_else(|| {
            CensorError::config(format!(
                "a {name} threshold is set but no {name} timeseries was supplied"
            ))
        })?;

        let keep = threshold_keep(series.samples(), threshold);
        Ok(if self.config.stringent {
            widen_stringent(&keep)
        } else {
            keep
        })
    }
}

/// Censor one run with `config`. See [`CensorEngine::compute`].
pub fn compute(
    fd: Option<&Timeseries>,
    dvars: Option<&Timeseries>,
    config: ThresholdConfig,
) -> CensorResult<CensorOutcome> {
    CensorEngine::new(config).compute(fd, dvars)
}

fn check_lengths(fd: Option<&Timeseries>, dvars: Option<&Timeseries>) -> CensorResult<()> {
    if let (Some(fd), Some(dvars)) = (fd, dvars) {
        if fd.len() != dvars.len() {
            return Err(CensorError::shape(format!(
                "{FRAMEWISE_DISPLACEMENT} has {} samples but {DVARS} has {}",
                fd.len(),
                dvars.len()
            )));
        }
    }
    for (name, series) in [(FRAMEWISE_DISPLACEMENT, fd), (DVARS, dvars)] {
        if series.is_some_and(Timeseries::is_empty) {
            return Err(CensorError::shape(format!("{name} timeseries is empty")));
        }
    }
    Ok(())
}
