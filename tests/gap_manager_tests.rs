use livechart::core::{GapManager, TimeGap, find_gaps, max_allowed_gap_diff};
use proptest::prelude::*;

fn naive_remove_gaps(gaps: &[TimeGap], start: i64, end: i64) -> i64 {
    let covered: i64 = gaps
        .iter()
        .map(|gap| (gap.end_epoch.min(end) - gap.start_epoch.max(start)).max(0))
        .sum();
    (end - start) - covered
}

#[test]
fn no_gaps_is_identity() {
    let gaps = GapManager::default();
    assert_eq!(gaps.remove_gaps(1_000, 9_000), 8_000);
    assert_eq!(gaps.remove_gaps(9_000, 1_000), -8_000);
    assert_eq!(gaps.shift_epoch(1_000.0, 500.0), 1_500.0);
}

#[test]
fn partially_overlapping_gaps_count_only_their_intersection() {
    let gaps = GapManager::new(vec![
        TimeGap::new(1_000, 2_000),
        TimeGap::new(5_000, 8_000),
    ]);
    // [1_500, 6_000] overlaps 500 ms of the first gap and 1_000 ms of the second.
    assert_eq!(gaps.remove_gaps(1_500, 6_000), 4_500 - 1_500);
    assert_eq!(gaps.remove_gaps(0, 10_000), 10_000 - 4_000);
    assert_eq!(gaps.remove_gaps(2_000, 5_000), 3_000);
}

#[test]
fn shift_skips_gaps_in_both_directions() {
    let gaps = GapManager::new(vec![TimeGap::new(1_000, 2_000)]);
    assert_eq!(gaps.shift_epoch(500.0, 1_000.0), 2_500.0);
    assert_eq!(gaps.shift_epoch(2_500.0, -1_000.0), 500.0);
}

#[test]
fn gaps_are_only_found_above_the_allowed_spacing() {
    assert_eq!(max_allowed_gap_diff(1_000), 60_000);
    assert_eq!(max_allowed_gap_diff(3_600_000), 3_600_000);

    let epochs = [0, 60_000, 120_000, 400_000, 460_000];
    assert_eq!(
        find_gaps(&epochs, max_allowed_gap_diff(60_000)),
        vec![TimeGap::new(120_000, 400_000)]
    );
    assert!(find_gaps(&epochs[..3], max_allowed_gap_diff(60_000)).is_empty());
}

#[test]
fn history_gaps_are_inserted_in_front_of_known_ones() {
    let mut gaps = GapManager::new(vec![TimeGap::new(10_000, 20_000)]);
    gaps.insert_in_front(vec![TimeGap::new(1_000, 2_000), TimeGap::new(9_000, 15_000)]);
    assert_eq!(
        gaps.gaps(),
        &[TimeGap::new(1_000, 2_000), TimeGap::new(10_000, 20_000)]
    );
    assert_eq!(gaps.remove_gaps(0, 30_000), 30_000 - 11_000);
}

#[test]
fn resumed_feed_appends_gaps_after_the_last_one() {
    let mut gaps = GapManager::new(vec![TimeGap::new(10_000, 20_000)]);
    gaps.append_gaps(vec![TimeGap::new(15_000, 18_000), TimeGap::new(30_000, 40_000)]);
    assert_eq!(
        gaps.gaps(),
        &[TimeGap::new(10_000, 20_000), TimeGap::new(30_000, 40_000)]
    );
    assert!(gaps.is_in_gap(35_000));
    assert!(!gaps.is_in_gap(20_000));
}

fn gap_list() -> impl Strategy<Value = Vec<TimeGap>> {
    prop::collection::vec((1i64..50_000, 1i64..50_000), 0..12).prop_map(|steps| {
        let mut cursor = 0;
        steps
            .into_iter()
            .map(|(free, closed)| {
                let start = cursor + free;
                cursor = start + closed;
                TimeGap::new(start, cursor)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn remove_gaps_matches_interval_subtraction(
        gaps in gap_list(),
        start in 0i64..700_000,
        span in 0i64..700_000,
    ) {
        let manager = GapManager::new(gaps.clone());
        let end = start + span;
        let expected = naive_remove_gaps(&gaps, start, end);
        prop_assert_eq!(manager.remove_gaps(start, end), expected);
        prop_assert_eq!(manager.remove_gaps(end, start), -expected);
    }

    #[test]
    fn shift_inverts_remove_gaps_outside_gaps(
        gaps in gap_list(),
        start in 0i64..700_000,
        span in 0i64..700_000,
    ) {
        let manager = GapManager::new(gaps);
        let end = start + span;
        prop_assume!(!manager.is_in_gap(start) && !manager.is_in_gap(end));
        let visual = manager.remove_gaps(start, end) as f64;
        let shifted = manager.shift_epoch(end as f64, -visual);
        // Landing exactly on a gap end is equivalent to its start.
        prop_assert_eq!(manager.remove_gaps(start, shifted.round() as i64), 0);
    }
}
