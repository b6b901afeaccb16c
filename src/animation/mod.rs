//! Time-based interpolation primitives driven by the frame clock.
//!
//! Every animated scalar is an independent [`AnimatedValue`]; there is no
//! global ticker. Callers pass the frame time (`now_ms`, wall-clock epoch
//! milliseconds) into every query, which keeps the whole pipeline
//! deterministic under test.

mod blink;
mod keyframe;

pub use blink::BlinkAnimation;
pub use keyframe::{Interpolate, Keyframe};

use serde::{Deserialize, Serialize};

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Curve {
    Linear,
    /// Cubic ease-out: fast start, gentle landing.
    #[default]
    EaseOut,
    EaseInOut,
}

impl Curve {
    #[must_use]
    pub fn transform(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Scalar interpolated from `from` to `to` over `duration_ms`.
///
/// Redirecting with [`AnimatedValue::set_target`] restarts from the value
/// in flight at `now_ms`, never from the previous target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatedValue {
    from: f64,
    to: f64,
    start_ms: i64,
    duration_ms: f64,
    curve: Curve,
}

impl AnimatedValue {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start_ms: 0,
            duration_ms: 0.0,
            curve: Curve::EaseOut,
        }
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Linear progress in `[0, 1]` at `now_ms`.
    #[must_use]
    pub fn progress(&self, now_ms: i64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) as f64 / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn value(&self, now_ms: i64) -> f64 {
        let progress = self.progress(now_ms);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.curve.transform(progress)
    }

    #[must_use]
    pub fn is_animating(&self, now_ms: i64) -> bool {
        self.progress(now_ms) < 1.0
    }

    /// Starts (or redirects) the animation towards `value`.
    ///
    /// Re-targeting to the current target is a no-op so per-frame callers do
    /// not keep restarting the same transition.
    pub fn set_target(&mut self, value: f64, duration_ms: f64, now_ms: i64) {
        if value == self.to {
            return;
        }
        self.from = self.value(now_ms);
        self.to = value;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms.max(0.0);
    }

    /// Runs a fresh `from -> to` transition regardless of the current state.
    pub fn restart(&mut self, from: f64, to: f64, duration_ms: f64, now_ms: i64) {
        self.from = from;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms.max(0.0);
    }

    /// Jumps to `value` with no transition.
    pub fn snap(&mut self, value: f64) {
        self.from = value;
        self.to = value;
        self.duration_ms = 0.0;
    }

    /// Freezes the animation at its current value.
    pub fn stop(&mut self, now_ms: i64) {
        let value = self.value(now_ms);
        self.snap(value);
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimatedValue, Curve};

    #[test]
    fn ease_out_is_monotonic_and_bounded() {
        let mut previous = 0.0;
        for step in 0..=20 {
            let value = Curve::EaseOut.transform(f64::from(step) / 20.0);
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(Curve::EaseOut.transform(0.0), 0.0);
        assert_eq!(Curve::EaseOut.transform(1.0), 1.0);
        assert_eq!(Curve::EaseOut.transform(7.0), 1.0);
    }

    #[test]
    fn zero_duration_snaps_to_target() {
        let mut value = AnimatedValue::new(1.0);
        value.set_target(5.0, 0.0, 1_000);
        assert_eq!(value.value(1_000), 5.0);
        assert!(!value.is_animating(1_000));
    }

    #[test]
    fn retargeting_same_value_does_not_restart() {
        let mut value = AnimatedValue::new(0.0).with_curve(Curve::Linear);
        value.set_target(10.0, 100.0, 0);
        value.set_target(10.0, 100.0, 50);
        assert!((value.value(50) - 5.0).abs() <= 1e-12);
        assert_eq!(value.value(100), 10.0);
    }
}
