//! Error types shared across prepcensor crates.

use std::path::PathBuf;

/// Top-level error type for prepcensor operations.
#[derive(Debug, thiserror::Error)]
pub enum CensorError {
    /// No usable censor criterion, or a criterion without its timeseries.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Timeseries lengths disagree or are empty.
    #[error("Shape error: {message}")]
    Shape { message: String },

    /// A configuration value could not be converted to the required type.
    #[error("Conversion error: {message}")]
    Conversion { message: String },

    /// A required column is absent from a confound table.
    #[error("Missing data: column '{column}' not found in {table}")]
    MissingData { column: String, table: String },

    /// The confound table could not be parsed.
    #[error("Confound table error: {message}")]
    Table { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CensorError.
pub type CensorResult<T> = Result<T, CensorError>;

impl CensorError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape {
            message: msg.into(),
        }
    }

    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion {
            message: msg.into(),
        }
    }

    pub fn missing_data(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MissingData {
            column: column.into(),
            table: table.into(),
        }
    }

    pub fn table(msg: impl Into<String>) -> Self {
        Self::Table {
            message: msg.into(),
        }
    }

    /// Whether this error only invalidates the run that produced it.
    ///
    /// Run-scoped errors are skipped and reported by batch callers; the
    /// remaining ones (bad configuration) abort the whole batch.
    pub fn is_run_scoped(&self) -> bool {
        !matches!(self, Self::Config { .. } | Self::Conversion { .. })
    }
}
