//! Per-criterion thresholding and stringent widening.

/// Keep every frame whose value is at or below `threshold`.
///
/// `NaN` samples count as `0.0`, matching the convention that the first
/// frame of a motion metric has no prior frame.
pub fn threshold_keep(values: &[f64], threshold: f64) -> Vec<bool> {
    values
        .iter()
        .map(|&v| {
            let v = if v.is_nan() { 0.0 } else { v };
            v <= threshold
        })
        .collect()
}

/// Stringent widening: frame `i` survives only if frames `i - 2`, `i - 1`,
/// `i` and `i + 1` were all kept. Out-of-range neighbours count as kept.
///
/// Seen from a rejected frame `j`, this censors `j - 1`, `j`, `j + 1` and
/// `j + 2`: one before and two after.
pub fn widen_stringent(keep: &[bool]) -> Vec<bool> {
    let kept_at = |i: isize| -> bool {
        if i < 0 {
            return true;
        }
        keep.get(i as usize).copied().unwrap_or(true)
    };

    (0..keep.len() as isize)
        .map(|i| kept_at(i) && kept_at(i + 1) && kept_at(i - 1) && kept_at(i - 2))
        .collect()
}

/// Elementwise AND of two equally long masks.
pub fn intersect(a: &[bool], b: &[bool]) -> Vec<bool> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x && y).collect()
}
