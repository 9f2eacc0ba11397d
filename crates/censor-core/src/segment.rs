//! Segment pruning: censor kept runs that are too short to be useful.

use std::ops::Range;

/// Maximal runs of consecutive kept frames, as half-open index ranges.
///
/// Equivalent to differencing the zero-padded mask: a 0→1 step opens a run
/// and a 1→0 step closes it.
pub fn kept_segments(keep: &[bool]) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut start = None;

    for (i, &k) in keep.iter().enumerate() {
        match (k, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                segments.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        segments.push(s..keep.len());
    }

    segments
}

/// Censor every kept run strictly shorter than `min_len`. Censored runs are
/// left as they are, so pruning is idempotent.
pub fn prune_short_segments(keep: &mut [bool], min_len: usize) {
    for segment in kept_segments(keep) {
        if segment.len() < min_len {
            keep[segment].fill(false);
        }
    }
}
