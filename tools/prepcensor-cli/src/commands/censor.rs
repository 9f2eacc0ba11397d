//! Censor every matching run in an fMRIPrep derivatives directory.

use std::path::PathBuf;

use prepcensor_censor_core::{CensorEngine, ThresholdConfig};
use prepcensor_confound_model::{FsRunDiscovery, RunDiscovery};

use crate::batch::run_batch;

pub fn run(
    fmriprep: PathBuf,
    out_dir: PathBuf,
    config: ThresholdConfig,
    task: String,
    jobs: usize,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let discovery = FsRunDiscovery::new(&fmriprep, &task).map_err(|e| {
        anyhow::anyhow!(
            "{} either does not exist or cannot be read: {e}",
            fmriprep.display()
        )
    })?;

    std::fs::create_dir_all(&out_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create output directory {}: {e}", out_dir.display())
    })?;

    let runs: Vec<_> = discovery.runs()?.collect();
    tracing::info!(
        "Found {} task-{task} run(s) under {}",
        runs.len(),
        discovery.root().display()
    );

    let engine = CensorEngine::new(config);
    let report = run_batch(runs, &out_dir, &engine, jobs)?;

    if let Some(path) = &report_path {
        let json = serde_json::to_string_pretty(&report.to_json())?;
        std::fs::write(path, json)
            .map_err(|e| anyhow::anyhow!("Failed to write report {}: {e}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    println!("{} run(s) censored", report.runs.len());
    println!("{} file(s) written", report.files_written());
    println!("{} existing file(s) kept", report.files_skipped());
    println!("{} run(s) skipped", report.failed.len());
    for failed in &report.failed {
        println!("  - {}: {}", failed.run, failed.reason);
    }

    Ok(())
}
