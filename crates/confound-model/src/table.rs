//! Tab-separated confound tables as written by fMRIPrep.
//!
//! The first row is a header of column names; each further row is one
//! timepoint. Missing cells are written as `n/a`.

use std::io::Read;
use std::path::Path;

use prepcensor_common::{CensorError, CensorResult};

use crate::timeseries::Timeseries;

/// A confound table keyed by column name.
#[derive(Debug, Clone)]
pub struct ConfoundTable {
    /// Display name used in error messages (usually the file name).
    name: String,
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl ConfoundTable {
    /// Read a table from a `.tsv` file.
    pub fn from_path(path: &Path) -> CensorResult<Self> {
        if !path.is_file() {
            return Err(CensorError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(name, file)
    }

    /// Parse a table from any reader.
    pub fn from_reader(name: impl Into<String>, reader: impl Read) -> CensorResult<Self> {
        let name = name.into();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| CensorError::table(format!("{name}: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let records = rdr
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CensorError::table(format!("{name}: {e}")))?;

        Ok(Self {
            name,
            headers,
            records,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of timepoints (data rows).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Extract a numeric column. Missing cells become `NaN`.
    pub fn column(&self, column: &str) -> CensorResult<Timeseries> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| CensorError::missing_data(column, &self.name))?;

        let samples = self
            .records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let cell = record.get(idx).unwrap_or("");
                parse_cell(cell).ok_or_else(|| {
                    CensorError::table(format!(
                        "{}: row {}, column '{column}': '{cell}' is not a number",
                        self.name,
                        row + 1
                    ))
                })
            })
            .collect::<CensorResult<Vec<_>>>()?;

        Ok(Timeseries::new(samples))
    }

    /// Extract a column only if the table has it.
    pub fn optional_column(&self, column: &str) -> CensorResult<Option<Timeseries>> {
        if self.has_column(column) {
            self.column(column).map(Some)
        } else {
            Ok(None)
        }
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("n/a") || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}
