use crate::animation::{AnimatedValue, BlinkAnimation, Curve, Keyframe};
use crate::core::{Candle, SeriesEntry, expand_flat_range};

/// Animated top/bottom quote bounds.
///
/// The first targets after construction or after [`QuoteBounds::request_snap`]
/// are applied with no transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct QuoteBounds {
    top: AnimatedValue,
    bottom: AnimatedValue,
    snap_next: bool,
}

impl Default for QuoteBounds {
    fn default() -> Self {
        Self {
            top: AnimatedValue::new(1.0),
            bottom: AnimatedValue::new(0.0),
            snap_next: true,
        }
    }
}

impl QuoteBounds {
    pub(super) fn request_snap(&mut self) {
        self.snap_next = true;
    }

    pub(super) fn set_targets(&mut self, bottom: f64, top: f64, duration_ms: f64, now_ms: i64) {
        let (bottom, top) = expand_flat_range(bottom, top);
        if self.snap_next {
            self.bottom.snap(bottom);
            self.top.snap(top);
            self.snap_next = false;
            return;
        }
        self.bottom.set_target(bottom, duration_ms, now_ms);
        self.top.set_target(top, duration_ms, now_ms);
    }

    /// `(bottom, top)` as painted at `now_ms`.
    #[must_use]
    pub(super) fn current(&self, now_ms: i64) -> (f64, f64) {
        (self.bottom.value(now_ms), self.top.value(now_ms))
    }

    #[must_use]
    pub(super) fn targets(&self) -> (f64, f64) {
        (self.bottom.target(), self.top.target())
    }

    #[must_use]
    pub(super) fn is_animating(&self, now_ms: i64) -> bool {
        self.bottom.is_animating(now_ms) || self.top.is_animating(now_ms)
    }
}

/// Glide of the latest entry from its previous state to the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CurrentTickTransition {
    previous: Option<SeriesEntry>,
    progress: AnimatedValue,
}

impl Default for CurrentTickTransition {
    fn default() -> Self {
        Self {
            previous: None,
            progress: AnimatedValue::new(1.0).with_curve(Curve::EaseOut),
        }
    }
}

impl CurrentTickTransition {
    /// Starts a glide from `previous` to whatever the latest entry is now.
    ///
    /// A freshly opened candle grows out of a flat candle at its open price
    /// instead of sliding over from the closed one.
    pub(super) fn start(
        &mut self,
        previous: SeriesEntry,
        current: SeriesEntry,
        duration_ms: f64,
        now_ms: i64,
    ) {
        let source = match (previous, current) {
            (SeriesEntry::Candle(closed), SeriesEntry::Candle(open)) if closed.epoch != open.epoch => {
                SeriesEntry::Candle(
                    Candle::flat(open.epoch, open.open).with_current_epoch(open.current_epoch),
                )
            }
            _ => previous,
        };
        self.previous = Some(source);
        self.progress.restart(0.0, 1.0, duration_ms, now_ms);
    }

    pub(super) fn reset(&mut self) {
        self.previous = None;
        self.progress.snap(1.0);
    }

    /// Latest entry to paint at `now_ms`.
    #[must_use]
    pub(super) fn animated(&self, current: Option<SeriesEntry>, now_ms: i64) -> Option<SeriesEntry> {
        let current = current?;
        match self.previous {
            Some(previous) if self.progress.is_animating(now_ms) => {
                Some(Keyframe::new(previous, current, self.progress.value(now_ms)).value())
            }
            _ => Some(current),
        }
    }
}

/// Every time-driven value the engine paints with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ChartAnimationState {
    pub(super) quote_bounds: QuoteBounds,
    pub(super) current_tick: CurrentTickTransition,
    /// Progress of the annotation set swap.
    pub(super) annotations: AnimatedValue,
    pub(super) blink: BlinkAnimation,
}

impl ChartAnimationState {
    #[must_use]
    pub(super) fn new(blink_period_ms: f64) -> Self {
        Self {
            quote_bounds: QuoteBounds::default(),
            current_tick: CurrentTickTransition::default(),
            annotations: AnimatedValue::new(1.0),
            blink: BlinkAnimation::new(blink_period_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CurrentTickTransition, QuoteBounds};
    use crate::core::{Candle, SeriesEntry, Tick};

    #[test]
    fn first_bounds_snap_then_animate() {
        let mut bounds = QuoteBounds::default();
        bounds.set_targets(10.0, 20.0, 300.0, 0);
        assert_eq!(bounds.current(0), (10.0, 20.0));

        bounds.set_targets(0.0, 20.0, 300.0, 1_000);
        assert!(bounds.is_animating(1_100));
        assert_eq!(bounds.current(1_300), (0.0, 20.0));
    }

    #[test]
    fn flat_targets_are_expanded() {
        let mut bounds = QuoteBounds::default();
        bounds.set_targets(5.0, 5.0, 300.0, 0);
        assert_eq!(bounds.targets(), (3.0, 7.0));
    }

    #[test]
    fn line_tick_glides_from_previous() {
        let mut transition = CurrentTickTransition::default();
        let previous = SeriesEntry::Tick(Tick::new(1_000, 10.0));
        let current = SeriesEntry::Tick(Tick::new(2_000, 20.0));
        transition.start(previous, current, 100.0, 0);

        let halfway = transition.animated(Some(current), 50).map(SeriesEntry::epoch);
        assert!(halfway.is_some_and(|epoch| epoch > 1_000 && epoch < 2_000));
        assert_eq!(transition.animated(Some(current), 100), Some(current));
    }

    #[test]
    fn new_candle_grows_from_its_open() {
        let mut transition = CurrentTickTransition::default();
        let closed = SeriesEntry::Candle(Candle::flat(0, 10.0));
        let Ok(open) = Candle::new(60_000, 12.0, 15.0, 11.0, 14.0) else {
            panic!("valid candle");
        };
        let current = SeriesEntry::Candle(open);
        transition.start(closed, current, 100.0, 0);

        let Some(SeriesEntry::Candle(start)) = transition.animated(Some(current), 0) else {
            panic!("candle expected");
        };
        assert_eq!(start.epoch, 60_000);
        assert_eq!(start.close, 12.0);
    }
}
