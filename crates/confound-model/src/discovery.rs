//! Run discovery over an fMRIPrep derivatives tree.
//!
//! Subjects are `sub-*` directories under the derivatives root. Each
//! subject's data root is one of:
//!
//! - `<root>/<sub>/fmriprep/<sub>` (legacy layout)
//! - `<root>/<sub>/<sub>` (nested layout)
//! - `<root>/<sub>` (flat layout)
//!
//! Sessions are `ses-*` directories directly under the data root. Confound
//! tables live in the `func` directory of the subject or of each session.

use std::path::{Path, PathBuf};

use prepcensor_common::{CensorError, CensorResult};

/// Suffix shared by every fMRIPrep confound table.
pub const CONFOUNDS_SUFFIX: &str = "desc-confounds_timeseries.tsv";

/// One functional run and where its confound table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLocation {
    pub subject: String,
    pub session: Option<String>,
    pub confounds: PathBuf,
}

impl RunLocation {
    /// Human-readable identifier, e.g. `sub-01/ses-1/sub-01_ses-1_task-rest_...tsv`.
    pub fn id(&self) -> String {
        let file = self
            .confounds
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &self.session {
            Some(ses) => format!("{}/{}/{}", self.subject, ses, file),
            None => format!("{}/{}", self.subject, file),
        }
    }
}

/// A source of runs to censor.
///
/// Implementations list subjects up front and may find each subject's runs
/// lazily; per-subject failures are yielded as items so callers can skip
/// them and continue.
pub trait RunDiscovery {
    fn runs(&self) -> CensorResult<Box<dyn Iterator<Item = CensorResult<RunLocation>> + '_>>;
}

/// Filesystem-backed discovery over a derivatives directory.
#[derive(Debug, Clone)]
pub struct FsRunDiscovery {
    root: PathBuf,
    task: String,
}

impl FsRunDiscovery {
    /// `task` is the BIDS task label, e.g. `rest`.
    pub fn new(root: impl Into<PathBuf>, task: impl Into<String>) -> CensorResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CensorError::FileNotFound { path: root });
        }
        Ok(Self {
            root,
            task: task.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subject directory names, sorted.
    pub fn subjects(&self) -> CensorResult<Vec<String>> {
        prefixed_dirs(&self.root, "sub-")
    }

    /// The directory holding a subject's `func`/`ses-*` folders.
    pub fn data_root(&self, subject: &str) -> PathBuf {
        let subject_dir = self.root.join(subject);
        let legacy = subject_dir.join("fmriprep").join(subject);
        if legacy.is_dir() {
            return legacy;
        }
        let nested = subject_dir.join(subject);
        if nested.is_dir() {
            return nested;
        }
        subject_dir
    }

    fn subject_runs(&self, subject: &str) -> CensorResult<Vec<RunLocation>> {
        let data_root = self.data_root(subject);
        let sessions = prefixed_dirs(&data_root, "ses-")?;

        let func_dirs: Vec<(Option<String>, PathBuf)> = if sessions.is_empty() {
            vec![(None, data_root.join("func"))]
        } else {
            sessions
                .into_iter()
                .map(|ses| {
                    let dir = data_root.join(&ses).join("func");
                    (Some(ses), dir)
                })
                .collect()
        };

        let mut runs = Vec::new();
        for (session, func_dir) in func_dirs {
            if !func_dir.is_dir() {
                tracing::debug!("No func directory at {}", func_dir.display());
                continue;
            }
            for confounds in self.confound_files(&func_dir)? {
                runs.push(RunLocation {
                    subject: subject.to_string(),
                    session: session.clone(),
                    confounds,
                });
            }
        }
        Ok(runs)
    }

    fn confound_files(&self, func_dir: &Path) -> CensorResult<Vec<PathBuf>> {
        let task_tag = format!("task-{}", self.task);
        let mut files = Vec::new();
        for entry in std::fs::read_dir(func_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.contains(&task_tag) && name.ends_with(CONFOUNDS_SUFFIX) && entry.path().is_file()
            {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl RunDiscovery for FsRunDiscovery {
    fn runs(&self) -> CensorResult<Box<dyn Iterator<Item = CensorResult<RunLocation>> + '_>> {
        let subjects = self.subjects()?;
        Ok(Box::new(subjects.into_iter().flat_map(move |subject| {
            match self.subject_runs(&subject) {
                Ok(runs) => runs.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }
        })))
    }
}

/// Directory children whose names start with `prefix`, sorted.
fn prefixed_dirs(dir: &Path, prefix: &str) -> CensorResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) && entry.path().is_dir() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
