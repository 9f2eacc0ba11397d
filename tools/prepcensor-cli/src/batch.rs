//! Per-run censoring and batch aggregation.
//!
//! Runs are independent: each reads its own confound table and writes its
//! own outputs, so the batch fans out over a rayon pool and only joins to
//! build the report. Run-scoped failures are recorded and skipped; anything
//! else aborts the batch.

use std::path::{Path, PathBuf};

use prepcensor_censor_core::{CensorEngine, CensorOutcome, Criteria};
use prepcensor_common::{CensorError, CensorResult};
use prepcensor_confound_model::{
    write_outputs, CensorOutputPaths, ConfoundTable, RunLocation, Timeseries, DVARS,
    FRAMEWISE_DISPLACEMENT,
};
use rayon::prelude::*;
use serde::Serialize;

/// A run that was censored.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run: String,
    pub mask: PathBuf,
    pub metadata: PathBuf,
    pub timeseries_length: usize,
    pub censored_timepoints: usize,
    pub percent_censored: f64,
    pub files_written: usize,
    pub files_skipped: usize,
}

/// A run that could not be censored.
#[derive(Debug, Clone, Serialize)]
pub struct FailedRun {
    pub run: String,
    pub reason: String,
}

/// Aggregate outcome of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub runs: Vec<RunRecord>,
    pub failed: Vec<FailedRun>,
}

impl BatchReport {
    pub fn files_written(&self) -> usize {
        self.runs.iter().map(|r| r.files_written).sum()
    }

    pub fn files_skipped(&self) -> usize {
        self.runs.iter().map(|r| r.files_skipped).sum()
    }

    /// JSON form written by `--report`, with totals up front.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "summary": {
                "censored_runs": self.runs.len(),
                "failed_runs": self.failed.len(),
                "files_written": self.files_written(),
                "files_skipped": self.files_skipped(),
            },
            "runs": self.runs,
            "failed": self.failed,
        })
    }
}

/// Read the series a run needs. Columns required by a configured criterion
/// must exist and parse; FD is still read when present so `meanFD` can be
/// reported, but an unreadable FD column that no criterion uses only drops
/// `meanFD`.
pub fn load_series(
    table: &ConfoundTable,
    criteria: &Criteria,
) -> CensorResult<(Option<Timeseries>, Option<Timeseries>)> {
    let fd = if criteria.fd_thresh().is_some() {
        Some(table.column(FRAMEWISE_DISPLACEMENT)?)
    } else {
        match table.optional_column(FRAMEWISE_DISPLACEMENT) {
            Ok(fd) => fd,
            Err(e) => {
                tracing::warn!(
                    table = %table.name(),
                    "Ignoring unreadable {FRAMEWISE_DISPLACEMENT}, meanFD not reported: {e}"
                );
                None
            }
        }
    };
    let dvars = if criteria.dvars_thresh().is_some() {
        Some(table.column(DVARS)?)
    } else {
        None
    };
    Ok((fd, dvars))
}

/// Censor one confound table without touching the filesystem beyond reading it.
pub fn censor_table(confounds: &Path, engine: &CensorEngine) -> CensorResult<CensorOutcome> {
    let table = ConfoundTable::from_path(confounds)?;
    let (fd, dvars) = load_series(&table, &engine.config().criteria)?;
    engine.compute(fd.as_ref(), dvars.as_ref())
}

/// Censor one discovered run and persist its outputs under `out_root`.
pub fn process_run(
    run: &RunLocation,
    out_root: &Path,
    engine: &CensorEngine,
) -> CensorResult<RunRecord> {
    let paths = CensorOutputPaths::for_run(out_root, run)?;
    let outcome = censor_table(&run.confounds, engine)?;
    let written = write_outputs(&paths, &outcome.mask, &outcome.summary)?;

    tracing::debug!(
        run = %run.id(),
        censored = outcome.summary.censored_timepoints,
        length = outcome.summary.timeseries_length,
        "censored run"
    );

    Ok(RunRecord {
        run: run.id(),
        mask: paths.mask,
        metadata: paths.metadata,
        timeseries_length: outcome.summary.timeseries_length,
        censored_timepoints: outcome.summary.censored_timepoints,
        percent_censored: outcome.summary.percent_censored,
        files_written: written.written(),
        files_skipped: written.skipped(),
    })
}

/// Censor every run, `jobs` at a time (0 lets rayon decide).
pub fn run_batch(
    runs: Vec<CensorResult<RunLocation>>,
    out_root: &Path,
    engine: &CensorEngine,
    jobs: usize,
) -> CensorResult<BatchReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| CensorError::Other(e.into()))?;

    let results: Vec<(String, CensorResult<RunRecord>)> = pool.install(|| {
        runs.into_par_iter()
            .map(|run| match run {
                Ok(run) => (run.id(), process_run(&run, out_root, engine)),
                Err(e) => ("<discovery>".to_string(), Err(e)),
            })
            .collect()
    });

    let mut report = BatchReport::default();
    for (run, result) in results {
        match result {
            Ok(record) => report.runs.push(record),
            Err(e) if e.is_run_scoped() => {
                tracing::warn!("Skipping {run}: {e}");
                report.failed.push(FailedRun {
                    run,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
