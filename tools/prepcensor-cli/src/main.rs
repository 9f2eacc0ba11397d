//! prepcensor CLI — Generate censor files from fMRIPrep confounds.
//!
//! Usage:
//!   prepcensor censor --fmriprep <DIR> --out-dir <DIR> [CRITERIA]   Censor every run in a derivatives tree
//!   prepcensor preview <CONFOUNDS> [CRITERIA]                       Censor one table and print the result

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prepcensor_censor_core::ThresholdConfig;
use prepcensor_common::{AppConfig, CensorDefaults, CensorError, LoggingConfig};

mod batch;
mod commands;

#[derive(Parser)]
#[command(
    name = "prepcensor",
    about = "Generate timepoint censor files from fMRIPrep confound tables",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/prepcensor/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Censor criteria shared by every command. Unset values fall back to the
/// configuration file.
#[derive(Args, Debug, Clone)]
pub struct CriteriaArgs {
    /// Framewise displacement threshold; frames above it are censored
    #[arg(long, value_name = "THRESH", value_parser = parse_threshold, allow_negative_numbers = true)]
    fd: Option<f64>,

    /// DVARS threshold; frames above it are censored
    #[arg(long, value_name = "THRESH", value_parser = parse_threshold, allow_negative_numbers = true)]
    dvars: Option<f64>,

    /// Minimum length of a kept segment; shorter segments are censored
    #[arg(long, value_name = "SEG_LENGTH", allow_negative_numbers = true)]
    seg: Option<i64>,

    /// Also censor one frame before and two after each flagged frame
    #[arg(long, overrides_with = "no_stringent")]
    stringent: bool,

    /// Disable stringent censoring even if the configuration file enables it
    #[arg(long, overrides_with = "stringent")]
    no_stringent: bool,
}

impl CriteriaArgs {
    /// Merge with file defaults and validate.
    pub fn resolve(&self, defaults: &CensorDefaults) -> Result<ThresholdConfig, CensorError> {
        ThresholdConfig::from_raw(
            self.fd.or(defaults.fd_thresh),
            self.dvars.or(defaults.dvars_thresh),
            self.seg.or(defaults.segment),
            self.stringent_flag().unwrap_or(defaults.stringent),
        )
    }

    /// The command-line choice, if one was made. The last of
    /// `--stringent`/`--no-stringent` wins.
    fn stringent_flag(&self) -> Option<bool> {
        match (self.stringent, self.no_stringent) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Censor every resting-state run in an fMRIPrep derivatives directory
    Censor {
        /// fMRIPrep derivatives directory
        #[arg(long)]
        fmriprep: PathBuf,

        /// Output directory; results go to <out-dir>/sub-<id>[/ses-<id>]/func
        #[arg(long)]
        out_dir: PathBuf,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// BIDS task label of the runs to censor
        #[arg(long)]
        task: Option<String>,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Also write the batch summary as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Censor a single confound table and print the summary to stdout
    Preview {
        /// Path to a *_desc-confounds_timeseries.tsv file
        confounds: PathBuf,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Print the mask (one 0/1 per line) instead of the summary
        #[arg(long)]
        mask: bool,
    },
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let parsed: f64 = value.trim().parse().map_err(|_| {
        CensorError::conversion(format!("cannot convert '{value}' to a threshold")).to_string()
    })?;
    if !parsed.is_finite() {
        return Err(CensorError::conversion(format!("threshold must be finite, got '{value}'")).to_string());
    }
    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    prepcensor_common::logging::init_logging(&LoggingConfig {
        level,
        json: cli.log_json || config.logging.json,
    });

    match cli.command {
        Commands::Censor {
            fmriprep,
            out_dir,
            criteria,
            task,
            jobs,
            report,
        } => {
            let threshold = criteria.resolve(&config.censor)?;
            let task = task.unwrap_or_else(|| config.censor.task.clone());
            commands::censor::run(fmriprep, out_dir, threshold, task, jobs, report)
        }
        Commands::Preview {
            confounds,
            criteria,
            mask,
        } => {
            let threshold = criteria.resolve(&config.censor)?;
            commands::preview::run(confounds, threshold, mask)
        }
    }
}
