//! prepcensor Confound Model
//!
//! Defines the data contracts shared by the censor engine and the CLI:
//! - **Timeseries:** Per-timepoint confound samples with missing-value handling
//! - **Confound table:** Tab-separated fMRIPrep confounds keyed by column name
//! - **Censor outputs:** Keep/censor masks and their summary metadata
//! - **Layout:** Run discovery over a derivatives tree and output naming
//!
//! Everything except [`discovery`] and [`layout`] is plain data with no I/O.

pub mod censor;
pub mod discovery;
pub mod layout;
pub mod table;
pub mod timeseries;

pub use censor::*;
pub use discovery::*;
pub use layout::*;
pub use table::*;
pub use timeseries::*;
