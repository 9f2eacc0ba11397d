//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CensorError, CensorResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default censoring parameters.
    #[serde(default)]
    pub censor: CensorDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default censoring parameters, overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensorDefaults {
    /// Framewise displacement threshold.
    #[serde(default)]
    pub fd_thresh: Option<f64>,

    /// DVARS threshold.
    #[serde(default)]
    pub dvars_thresh: Option<f64>,

    /// Minimum kept segment length.
    #[serde(default)]
    pub segment: Option<i64>,

    /// Censor one frame before and two after each flagged frame.
    #[serde(default)]
    pub stringent: bool,

    /// BIDS task label used to select confound tables.
    #[serde(default = "default_task")]
    pub task: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "prepcensor=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for CensorDefaults {
    fn default() -> Self {
        Self {
            fd_thresh: None,
            dvars_thresh: None,
            segment: None,
            stringent: false,
            task: default_task(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_task() -> String {
    "rest".to_string()
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], failures
    /// are returned to the caller.
    pub fn load_from(path: &Path) -> CensorResult<Self> {
        if !path.exists() {
            return Err(CensorError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("prepcensor").join("config.json")
}
