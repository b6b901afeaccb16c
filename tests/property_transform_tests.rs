use approx::assert_abs_diff_eq;
use livechart::axis::{XAxisConfig, XAxisModel, XAxisUpdate};
use livechart::core::{GapManager, PriceScale, TimeGap, TimeScale, VerticalPadding};
use proptest::prelude::*;

const WIDTH: f64 = 1_000.0;

fn stationary_axis() -> XAxisModel {
    let entries: Vec<i64> = (0..=100).map(|i| i * 1_000).collect();
    let mut model = XAxisModel::new(XAxisConfig::default(), WIDTH, 100_000);
    let _ = model.update(XAxisUpdate {
        is_live: Some(false),
        granularity_ms: Some(0),
        entries: Some(&entries),
        min_epoch: Some(0),
        max_epoch: Some(100_000),
    });
    model
}

fn epoch_outside_gap() -> impl Strategy<Value = i64> {
    prop_oneof![0i64..10_000, 200_001i64..600_000]
}

#[test]
fn stationary_axis_clamps_to_data_with_offset() {
    let mut model = stationary_axis();
    assert_abs_diff_eq!(model.ms_per_px(), 50.0);
    assert_eq!(model.right_bound_epoch(), 107_500);

    model.scroll_by(1_000.0);
    assert_eq!(model.right_bound_epoch(), 107_500);
    model.scroll_by(-1_000_000.0);
    assert_eq!(model.right_bound_epoch(), 7_500);
}

#[test]
fn price_scale_expands_flat_ranges_and_reserves_padding() {
    let padding = VerticalPadding {
        fraction: 0.1,
        min_px: 10.0,
    };
    let scale = PriceScale::new(50.0, 50.0, 400.0, padding);
    assert_abs_diff_eq!(scale.top_quote(), 52.0);
    assert_abs_diff_eq!(scale.bottom_quote(), 48.0);
    assert_abs_diff_eq!(scale.padding_px(), 40.0);
    assert_abs_diff_eq!(scale.quote_to_y(52.0), 40.0);
    assert_abs_diff_eq!(scale.quote_to_y(48.0), 360.0);
}

proptest! {
    #[test]
    fn epoch_round_trip_stays_within_one_pixel(
        epoch in epoch_outside_gap(),
        ms_per_px in 1.0f64..1_000.0,
    ) {
        let gaps = GapManager::new(vec![TimeGap::new(10_000, 200_000)]);
        let scale = TimeScale::new(ms_per_px, 500_000, WIDTH);
        let x = scale.x_from_epoch(epoch, &gaps);
        let back = scale.epoch_from_x(x, &gaps);
        prop_assert!(((back - epoch) as f64).abs() <= ms_per_px);
    }

    #[test]
    fn quote_round_trip_is_exact_enough(
        bottom in -10_000.0f64..10_000.0,
        span in 0.01f64..10_000.0,
        factor in 0.0f64..1.0,
        height in 50.0f64..2_000.0,
    ) {
        let top = bottom + span;
        let quote = bottom + span * factor;
        let scale = PriceScale::new(top, bottom, height, VerticalPadding::default());
        let y = scale.quote_to_y(quote);
        prop_assert!((scale.quote_from_y(y) - quote).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn scrolling_never_leaves_the_clamp_range(
        steps in prop::collection::vec(-5_000.0f64..5_000.0, 1..20),
    ) {
        let mut model = stationary_axis();
        for px in steps {
            model.scroll_by(px);
            let right = model.right_bound_epoch();
            prop_assert!((7_500..=107_500).contains(&right));

            model.scroll_by(0.0);
            prop_assert_eq!(model.right_bound_epoch(), right);
        }
    }
}
