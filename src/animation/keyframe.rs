use crate::core::{Candle, PixelPoint, SeriesEntry, Tick};

/// Values that can be blended between two keyframes.
pub trait Interpolate: Clone {
    /// Value at `t` in `[0, 1]` between `self` (t = 0) and `to` (t = 1).
    #[must_use]
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn lerp_epoch(from: i64, to: i64, t: f64) -> i64 {
    from + ((to - from) as f64 * t).round() as i64
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for PixelPoint {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        PixelPoint::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

impl Interpolate for Tick {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Tick::new(lerp_epoch(self.epoch, to.epoch, t), lerp(self.quote, to.quote, t))
    }
}

impl Interpolate for Candle {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Candle {
            epoch: lerp_epoch(self.epoch, to.epoch, t),
            open: lerp(self.open, to.open, t),
            high: lerp(self.high, to.high, t),
            low: lerp(self.low, to.low, t),
            close: lerp(self.close, to.close, t),
            current_epoch: lerp_epoch(self.current_epoch, to.current_epoch, t),
        }
    }
}

impl Interpolate for SeriesEntry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Tick(from), Self::Tick(to)) => Self::Tick(from.interpolate(to, t)),
            (Self::Candle(from), Self::Candle(to)) => Self::Candle(from.interpolate(to, t)),
            _ => *to,
        }
    }
}

/// Explicit before/after pair with the progress of the transition between
/// them, computed once per frame and handed to paint code.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    pub from: T,
    pub to: T,
    pub progress: f64,
}

impl<T: Interpolate> Keyframe<T> {
    #[must_use]
    pub fn new(from: T, to: T, progress: f64) -> Self {
        Self {
            from,
            to,
            progress: if progress.is_nan() {
                1.0
            } else {
                progress.clamp(0.0, 1.0)
            },
        }
    }

    /// Keyframe with no transition.
    #[must_use]
    pub fn settled(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            progress: 1.0,
        }
    }

    #[must_use]
    pub fn value(&self) -> T {
        if self.progress >= 1.0 {
            return self.to.clone();
        }
        self.from.interpolate(&self.to, self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::Keyframe;
    use crate::core::Tick;

    #[test]
    fn tick_keyframe_blends_epoch_and_quote() {
        let frame = Keyframe::new(Tick::new(1_000, 10.0), Tick::new(2_000, 20.0), 0.25);
        assert_eq!(frame.value(), Tick::new(1_250, 12.5));
        assert_eq!(Keyframe::settled(Tick::new(5, 1.0)).value(), Tick::new(5, 1.0));
    }
}
