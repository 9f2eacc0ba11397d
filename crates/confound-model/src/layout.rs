//! Output naming and persistence for censor results.
//!
//! A confound table `<stem>_desc-confounds_timeseries.tsv` produces
//! `<stem>_desc-censor_timeseries.tsv` (the mask) and
//! `<stem>_desc-censor_timeseries.json` (the summary). Outputs are mirrored
//! under the output root as `<out>/<sub>[/<ses>]/func`. Existing files are
//! never overwritten.

use std::path::{Path, PathBuf};

use prepcensor_common::{CensorError, CensorResult};

use crate::censor::{CensorMask, CensorSummary};
use crate::discovery::RunLocation;

const CONFOUNDS_DESC: &str = "_desc-confounds";
const CENSOR_SUFFIX: &str = "_desc-censor_timeseries";

/// The BIDS entities preceding `_desc-confounds` in a confound file name.
pub fn confounds_stem(confounds: &Path) -> CensorResult<String> {
    let name = confounds
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once(CONFOUNDS_DESC) {
        Some((stem, _)) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(CensorError::table(format!(
            "{name}: not a '{CONFOUNDS_DESC}' confound table name"
        ))),
    }
}

/// Directory receiving a run's censor outputs.
pub fn output_dir(out_root: &Path, run: &RunLocation) -> PathBuf {
    let mut dir = out_root.join(&run.subject);
    if let Some(ses) = &run.session {
        dir = dir.join(ses);
    }
    dir.join("func")
}

/// Where a run's mask and summary are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensorOutputPaths {
    pub mask: PathBuf,
    pub metadata: PathBuf,
}

impl CensorOutputPaths {
    /// Output paths for a confound table, placed in `dir`.
    pub fn in_dir(dir: &Path, confounds: &Path) -> CensorResult<Self> {
        let stem = confounds_stem(confounds)?;
        Ok(Self {
            mask: dir.join(format!("{stem}{CENSOR_SUFFIX}.tsv")),
            metadata: dir.join(format!("{stem}{CENSOR_SUFFIX}.json")),
        })
    }

    /// Output paths for a discovered run under `out_root`.
    pub fn for_run(out_root: &Path, run: &RunLocation) -> CensorResult<Self> {
        Self::in_dir(&output_dir(out_root, run), &run.confounds)
    }
}

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    /// Already present; left untouched.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub mask: FileStatus,
    pub metadata: FileStatus,
}

impl WriteOutcome {
    pub fn written(&self) -> usize {
        [self.mask, self.metadata]
            .iter()
            .filter(|s| **s == FileStatus::Written)
            .count()
    }

    pub fn skipped(&self) -> usize {
        2 - self.written()
    }
}

/// Write mask and summary, creating parent directories. Each file is
/// skipped independently if it already exists.
pub fn write_outputs(
    paths: &CensorOutputPaths,
    mask: &CensorMask,
    summary: &CensorSummary,
) -> CensorResult<WriteOutcome> {
    for parent in [paths.mask.parent(), paths.metadata.parent()]
        .into_iter()
        .flatten()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mask_status = write_if_absent(&paths.mask, || Ok(mask.to_tsv()))?;
    let metadata_status = write_if_absent(&paths.metadata, || Ok(summary.to_json_pretty()?))?;

    Ok(WriteOutcome {
        mask: mask_status,
        metadata: metadata_status,
    })
}

fn write_if_absent(
    path: &Path,
    contents: impl FnOnce() -> CensorResult<String>,
) -> CensorResult<FileStatus> {
    if path.exists() {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(FileStatus::Skipped);
    }
    std::fs::write(path, contents()?)?;
    Ok(FileStatus::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::censor::CensorSettings;

    fn run(session: Option<&str>) -> RunLocation {
        RunLocation {
            subject: "sub-01".to_string(),
            session: session.map(str::to_string),
            confounds: PathBuf::from(
                "/data/sub-01/func/sub-01_task-rest_run-2_desc-confounds_timeseries.tsv",
            ),
        }
    }

    #[test]
    fn test_censor_names_replace_confounds_desc() {
        let paths = CensorOutputPaths::for_run(Path::new("/out"), &run(Some("ses-1"))).unwrap();
        assert_eq!(
            paths.mask,
            PathBuf::from("/out/sub-01/ses-1/func/sub-01_task-rest_run-2_desc-censor_timeseries.tsv")
        );
        assert_eq!(
            paths.metadata,
            PathBuf::from("/out/sub-01/ses-1/func/sub-01_task-rest_run-2_desc-censor_timeseries.json")
        );

        let paths = CensorOutputPaths::for_run(Path::new("/out"), &run(None)).unwrap();
        assert!(paths.mask.starts_with("/out/sub-01/func"));
    }

    #[test]
    fn test_rejects_non_confounds_name() {
        let err = confounds_stem(Path::new("sub-01_task-rest_bold.nii.gz")).unwrap_err();
        assert!(matches!(err, CensorError::Table { .. }));
    }

    #[test]
    fn test_write_outputs_skips_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = CensorOutputPaths::in_dir(
            &tmp.path().join("sub-01").join("func"),
            Path::new("sub-01_task-rest_desc-confounds_timeseries.tsv"),
        )
        .unwrap();

        let mask = CensorMask::from_bits(&[1, 0, 1]);
        let summary = CensorSummary::from_mask(
            &mask,
            Some(0.1),
            CensorSettings {
                fd_thresh: Some(0.5),
                dvars_thresh: None,
                segment: None,
                one_before_two_after: false,
            },
        );

        let first = write_outputs(&paths, &mask, &summary).unwrap();
        assert_eq!(first.written(), 2);
        assert_eq!(std::fs::read_to_string(&paths.mask).unwrap(), "1\n0\n1\n");

        std::fs::write(&paths.mask, "sentinel").unwrap();
        std::fs::remove_file(&paths.metadata).unwrap();

        let second = write_outputs(&paths, &mask, &summary).unwrap();
        assert_eq!(second.mask, FileStatus::Skipped);
        assert_eq!(second.metadata, FileStatus::Written);
        assert_eq!(std::fs::read_to_string(&paths.mask).unwrap(), "sentinel");
    }
}
