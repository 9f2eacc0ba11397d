//! Censor outputs: the keep/censor mask and its summary metadata.

use serde::{Deserialize, Serialize};

/// Per-timepoint keep/censor decisions. `true` keeps the frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CensorMask {
    keep: Vec<bool>,
}

impl CensorMask {
    pub fn new(keep: Vec<bool>) -> Self {
        Self { keep }
    }

    /// Build a mask from 0/1 values; any non-zero value keeps the frame.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self::new(bits.iter().map(|&b| b != 0).collect())
    }

    pub fn len(&self) -> usize {
        self.keep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.keep
    }

    pub fn into_inner(self) -> Vec<bool> {
        self.keep
    }

    /// Mask as 0/1 values.
    pub fn bits(&self) -> Vec<u8> {
        self.keep.iter().map(|&k| u8::from(k)).collect()
    }

    pub fn kept_count(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    pub fn censored_count(&self) -> usize {
        self.keep.len() - self.kept_count()
    }

    /// True when every frame kept here is also kept by `other`.
    pub fn is_subset_of(&self, other: &CensorMask) -> bool {
        self.keep.len() == other.keep.len()
            && self.keep.iter().zip(&other.keep).all(|(&a, &b)| !a || b)
    }

    /// One `0`/`1` per line, newline-terminated.
    pub fn to_tsv(&self) -> String {
        let mut out = String::with_capacity(self.keep.len() * 2);
        for &k in &self.keep {
            out.push(if k { '1' } else { '0' });
            out.push('\n');
        }
        out
    }
}

/// The configuration echoed into every summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensorSettings {
    pub fd_thresh: Option<f64>,
    pub dvars_thresh: Option<f64>,
    /// Minimum kept segment length.
    pub segment: Option<usize>,
    /// Stringent mode: censor one frame before and two after each flagged frame.
    pub one_before_two_after: bool,
}

/// Metadata describing one censored run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensorSummary {
    pub timeseries_length: usize,
    pub censored_timepoints: usize,
    pub uncensored_timepoints: usize,
    /// Fraction of censored frames in `[0, 1]`.
    pub percent_censored: f64,
    /// Mean framewise displacement with missing frames counted as zero.
    #[serde(rename = "meanFD")]
    pub mean_fd: Option<f64>,
    pub settings: CensorSettings,
}

impl CensorSummary {
    pub fn from_mask(mask: &CensorMask, mean_fd: Option<f64>, settings: CensorSettings) -> Self {
        let timeseries_length = mask.len();
        let censored_timepoints = mask.censored_count();
        let percent_censored = if timeseries_length == 0 {
            0.0
        } else {
            censored_timepoints as f64 / timeseries_length as f64
        };

        Self {
            timeseries_length,
            censored_timepoints,
            uncensored_timepoints: mask.kept_count(),
            percent_censored,
            mean_fd,
            settings,
        }
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> CensorSettings {
        CensorSettings {
            fd_thresh: Some(0.5),
            dvars_thresh: None,
            segment: Some(5),
            one_before_two_after: true,
        }
    }

    #[test]
    fn test_mask_counts_and_tsv() {
        let mask = CensorMask::from_bits(&[1, 0, 1, 1, 0]);
        assert_eq!(mask.kept_count(), 3);
        assert_eq!(mask.censored_count(), 2);
        assert_eq!(mask.to_tsv(), "1\n0\n1\n1\n0\n");
        assert_eq!(mask.bits(), vec![1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_subset() {
        let narrow = CensorMask::from_bits(&[0, 0, 1, 0]);
        let wide = CensorMask::from_bits(&[1, 0, 1, 1]);
        assert!(narrow.is_subset_of(&wide));
        assert!(!wide.is_subset_of(&narrow));
        assert!(!narrow.is_subset_of(&CensorMask::from_bits(&[1, 1])));
    }

    #[test]
    fn test_summary_from_mask() {
        let mask = CensorMask::from_bits(&[1, 0, 1, 1]);
        let summary = CensorSummary::from_mask(&mask, Some(0.2), settings());
        assert_eq!(summary.timeseries_length, 4);
        assert_eq!(summary.censored_timepoints, 1);
        assert_eq!(summary.uncensored_timepoints, 3);
        assert!((summary.percent_censored - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_summary_json_keys() {
        let mask = CensorMask::from_bits(&[1, 1]);
        let summary = CensorSummary::from_mask(&mask, None, settings());
        let json = summary.to_json_pretty().unwrap();

        assert!(json.starts_with("{\n    \"timeseries_length\": 2,"));
        assert!(json.contains("\"meanFD\": null"));
        assert!(json.contains("\"one_before_two_after\": true"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["settings"]["segment"], 5);
        assert_eq!(value["settings"]["dvars_thresh"], serde_json::Value::Null);

        let back: CensorSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
