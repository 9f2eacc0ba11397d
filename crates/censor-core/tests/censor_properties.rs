use std::path::PathBuf;

use proptest::prelude::*;

use prepcensor_censor_core::segment::prune_short_segments;
use prepcensor_censor_core::{compute, Criteria, ThresholdConfig};
use prepcensor_confound_model::{ConfoundTable, Timeseries, DVARS, FRAMEWISE_DISPLACEMENT};

/// Motion-like samples with occasional missing frames.
fn samples(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            9 => 0.0f64..1.5,
            1 => Just(f64::NAN),
        ],
        len,
    )
}

fn series_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..60).prop_flat_map(|n| (samples(n), samples(n)))
}

proptest! {
    #[test]
    fn single_criterion_keeps_iff_at_or_below_threshold(
        values in (1usize..80).prop_flat_map(samples),
        thresh in 0.0f64..1.5,
    ) {
        let ts = Timeseries::new(values.clone());
        let outcome = compute(Some(&ts), None, ThresholdConfig::new(Criteria::Fd(thresh))).unwrap();
        for (i, v) in values.iter().enumerate() {
            let v = if v.is_nan() { 0.0 } else { *v };
            prop_assert_eq!(outcome.mask.as_slice()[i], v <= thresh);
        }
    }

    #[test]
    fn stringent_mask_is_subset_of_plain_mask(
        values in (1usize..80).prop_flat_map(samples),
        thresh in 0.0f64..1.5,
    ) {
        let ts = Timeseries::new(values);
        let config = ThresholdConfig::new(Criteria::Fd(thresh));
        let plain = compute(Some(&ts), None, config).unwrap();
        let stringent = compute(Some(&ts), None, config.with_stringent(true)).unwrap();
        prop_assert!(stringent.mask.is_subset_of(&plain.mask));
    }

    #[test]
    fn combined_mask_is_subset_of_each_criterion(
        (fd, dvars) in series_pair(),
        fd_t in 0.0f64..1.5,
        dvars_t in 0.0f64..1.5,
        stringent in any::<bool>(),
    ) {
        let fd = Timeseries::new(fd);
        let dvars = Timeseries::new(dvars);

        let both = ThresholdConfig::new(Criteria::Both { fd: fd_t, dvars: dvars_t }).with_stringent(stringent);
        let fd_only = ThresholdConfig::new(Criteria::Fd(fd_t)).with_stringent(stringent);
        let dvars_only = ThresholdConfig::new(Criteria::Dvars(dvars_t)).with_stringent(stringent);

        let combined = compute(Some(&fd), Some(&dvars), both).unwrap();
        let by_fd = compute(Some(&fd), Some(&dvars), fd_only).unwrap();
        let by_dvars = compute(Some(&fd), Some(&dvars), dvars_only).unwrap();

        prop_assert!(combined.mask.is_subset_of(&by_fd.mask));
        prop_assert!(combined.mask.is_subset_of(&by_dvars.mask));
    }

    #[test]
    fn pruning_is_idempotent(
        keep in prop::collection::vec(any::<bool>(), 0..100),
        min_len in 0usize..10,
    ) {
        let mut once = keep;
        prune_short_segments(&mut once, min_len);
        let mut twice = once.clone();
        prune_short_segments(&mut twice, min_len);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn summary_counts_are_consistent(
        (fd, dvars) in series_pair(),
        fd_t in 0.0f64..1.5,
        segment in prop::option::of(0i64..8),
        stringent in any::<bool>(),
    ) {
        let fd = Timeseries::new(fd);
        let dvars = Timeseries::new(dvars);
        let config = ThresholdConfig::from_raw(Some(fd_t), Some(1.0), segment, stringent).unwrap();
        let outcome = compute(Some(&fd), Some(&dvars), config).unwrap();
        let s = &outcome.summary;

        prop_assert_eq!(outcome.mask.len(), fd.len());
        prop_assert_eq!(s.timeseries_length, fd.len());
        prop_assert_eq!(s.censored_timepoints + s.uncensored_timepoints, s.timeseries_length);
        let expected = s.censored_timepoints as f64 / s.timeseries_length as f64;
        prop_assert!((s.percent_censored - expected).abs() < 1e-12);
    }
}

#[test]
fn fixture_table_censor() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("confounds")
        .join("sub-01_task-rest_run-1_desc-confounds_timeseries.tsv");
    let table = ConfoundTable::from_path(&path).expect("fixture table should parse");
    let fd = table.column(FRAMEWISE_DISPLACEMENT).unwrap();
    let dvars = table.column(DVARS).unwrap();

    let plain = compute(
        Some(&fd),
        Some(&dvars),
        ThresholdConfig::new(Criteria::Fd(0.5)),
    )
    .unwrap();
    assert_eq!(plain.mask.bits(), vec![1, 1, 1, 0, 1, 1, 1, 1, 0, 1, 1, 1]);

    let strict = compute(
        Some(&fd),
        Some(&dvars),
        ThresholdConfig::new(Criteria::Both { fd: 0.5, dvars: 30.0 })
            .with_stringent(true)
            .with_min_segment_length(2),
    )
    .unwrap();
    // FD flags frames 3 and 8, DVARS flags frame 3. Widening leaves kept
    // runs 0..2, 6..7 and 11..12; only the first is long enough.
    assert_eq!(strict.mask.bits(), vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(strict.summary.uncensored_timepoints, 2);
}
