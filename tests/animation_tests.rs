use approx::assert_abs_diff_eq;
use livechart::animation::{AnimatedValue, BlinkAnimation, Curve, Keyframe};
use livechart::core::{Candle, SeriesEntry, Tick};
use proptest::prelude::*;

proptest! {
    #[test]
    fn redirecting_never_jumps(
        start in -1_000.0f64..1_000.0,
        first_target in -1_000.0f64..1_000.0,
        second_target in -1_000.0f64..1_000.0,
        duration in 1.0f64..2_000.0,
        redirect_at in 0i64..3_000,
    ) {
        let mut value = AnimatedValue::new(start);
        value.set_target(first_target, duration, 0);
        let before = value.value(redirect_at);

        value.set_target(second_target, duration, redirect_at);
        prop_assert!((value.value(redirect_at) - before).abs() <= 1e-9);
        prop_assert!(
            (value.value(redirect_at + duration.ceil() as i64) - second_target).abs() <= 1e-9
        );
    }

    #[test]
    fn curves_stay_within_unit_range(t in -1.0f64..2.0) {
        for curve in [Curve::Linear, Curve::EaseOut, Curve::EaseInOut] {
            let value = curve.transform(t);
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }
}

#[test]
fn stop_freezes_the_value_in_flight() {
    let mut value = AnimatedValue::new(0.0).with_curve(Curve::Linear);
    value.set_target(100.0, 100.0, 0);
    value.stop(25);
    assert_abs_diff_eq!(value.value(25), 25.0);
    assert_abs_diff_eq!(value.value(1_000), 25.0);
    assert!(!value.is_animating(30));
}

#[test]
fn keyframes_interpolate_ticks_and_candles() {
    let tick = Keyframe::new(Tick::new(0, 10.0), Tick::new(1_000, 20.0), 0.5).value();
    assert_eq!(tick.epoch, 500);
    assert_abs_diff_eq!(tick.quote, 15.0);

    let from = Candle::new(0, 10.0, 12.0, 8.0, 10.0).expect("candle");
    let to = Candle::new(0, 10.0, 16.0, 8.0, 14.0).expect("candle");
    let candle = Keyframe::new(from, to, 0.5).value();
    assert_abs_diff_eq!(candle.high, 14.0);
    assert_abs_diff_eq!(candle.close, 12.0);
    assert_abs_diff_eq!(candle.open, 10.0);

    let settled = Keyframe::settled(SeriesEntry::Tick(Tick::new(5, 1.0))).value();
    assert_eq!(settled, SeriesEntry::Tick(Tick::new(5, 1.0)));
}

#[test]
fn keyframe_progress_is_clamped() {
    let value = Keyframe::new(0.0, 10.0, 3.0).value();
    assert_abs_diff_eq!(value, 10.0);
    let value = Keyframe::new(0.0, 10.0, -1.0).value();
    assert_abs_diff_eq!(value, 0.0);
}

#[test]
fn blink_only_runs_on_live_charts() {
    let mut blink = BlinkAnimation::new(500.0);
    blink.sync(false, true, 0);
    assert!(!blink.is_enabled());

    blink.sync(true, true, 1_000);
    assert!(blink.is_enabled());
    let progress = blink.progress(1_250);
    assert!((0.0..=1.0).contains(&progress));

    blink.sync(true, false, 1_500);
    assert!(!blink.is_enabled());
}
