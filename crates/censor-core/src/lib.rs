//! prepcensor Censor Core — The CensorEngine
//!
//! Turns per-timepoint confound metrics into keep/censor decisions:
//! - **Thresholding:** Keep frames at or below a framewise displacement / DVARS threshold
//! - **Stringent widening:** Also censor one frame before and two after each flagged frame
//! - **Combination:** A frame survives only if every configured criterion keeps it
//! - **Segment pruning:** Drop kept runs shorter than a minimum length
//!
//! This crate is pure computation — no I/O, no logging, no shared state.
//! All inputs are data; all outputs are data.

pub mod config;
pub mod engine;
pub mod segment;
pub mod threshold;

pub use config::{Criteria, ThresholdConfig};
pub use engine::{compute, CensorEngine, CensorOutcome};
