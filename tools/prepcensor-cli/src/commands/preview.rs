//! Censor a single confound table and print the result.

use std::path::PathBuf;

use prepcensor_censor_core::{CensorEngine, ThresholdConfig};

use crate::batch::censor_table;

pub fn run(confounds: PathBuf, config: ThresholdConfig, print_mask: bool) -> anyhow::Result<()> {
    let engine = CensorEngine::new(config);
    let outcome = censor_table(&confounds, &engine)
        .map_err(|e| anyhow::anyhow!("Failed to censor {}: {e}", confounds.display()))?;

    if print_mask {
        print!("{}", outcome.mask.to_tsv());
    } else {
        println!("{}", outcome.summary.to_json_pretty()?);
    }

    Ok(())
}
