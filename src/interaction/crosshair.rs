use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animation::Keyframe;
use crate::axis::XAxisModel;
use crate::core::{PixelPoint, PriceScale, Series, SeriesEntry};

use super::velocity::{VelocityTracker, crosshair_animation_duration_ms};

/// Distance from either canvas edge that triggers auto-pan while dragging.
pub const AUTO_PAN_EDGE_PX: f64 = 60.0;

/// Auto-pan speed applied to the viewport while the pointer sits at an edge.
pub const AUTO_PAN_SPEED_PX_PER_MS: f64 = 0.08;

/// When the crosshair snaps to an actual entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrosshairSnapPolicy {
    /// Snap only while the cursor epoch lies inside the data; outside it a
    /// virtual tick follows the pointer.
    #[default]
    WithinDataRange,
    /// Always snap to the nearest entry.
    Always,
}

/// Visible crosshair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairState {
    /// Snapped entry, or a virtual one outside the data range.
    pub tick: SeriesEntry,
    pub cursor_position: PixelPoint,
    pub is_visible: bool,
    pub show_details: bool,
    pub is_tick_within_data_range: bool,
    /// Glide duration from the previous tick to `tick`.
    pub animation_duration_ms: f64,
}

/// Outcome of a crosshair input, for the engine to forward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrosshairUpdate {
    /// `Some` when the snapped tick changed; `Some(None)` when it went away.
    pub tick_changed: Option<Option<SeriesEntry>>,
}

/// Resolves the entry shown under the cursor.
///
/// Returns `None` for an empty series. Inside `[first, last]` (or always with
/// [`CrosshairSnapPolicy::Always`]) the nearest entry wins, ties going to the
/// later one; otherwise a virtual entry at `{epoch, quote_from_y(y)}` is
/// returned with `false` for "within data range".
#[must_use]
pub fn find_tick_for_crosshair(
    series: &Series,
    epoch: i64,
    y: f64,
    price_scale: PriceScale,
    policy: CrosshairSnapPolicy,
) -> Option<(SeriesEntry, bool)> {
    let first = series.first_entry()?;
    let last = series.last_entry()?;
    let within = epoch >= first.epoch() && epoch <= last.epoch();
    if within || policy == CrosshairSnapPolicy::Always {
        return series.nearest_entry(epoch).map(|entry| (entry, true));
    }
    Some((
        series.create_virtual_tick(epoch, price_scale.quote_from_y(y)),
        false,
    ))
}

/// Pointer-tracking crosshair with edge auto-pan.
///
/// Drags (long press) block user scroll on the viewport and drive its pan
/// speed; hover only tracks.
#[derive(Debug, Clone, Default)]
pub struct CrosshairController {
    policy: CrosshairSnapPolicy,
    state: Option<CrosshairState>,
    previous_tick: Option<SeriesEntry>,
    changed_at_ms: i64,
    last_emitted: Option<SeriesEntry>,
    dragging: bool,
    velocity: VelocityTracker,
}

impl CrosshairController {
    #[must_use]
    pub fn new(policy: CrosshairSnapPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn policy(&self) -> CrosshairSnapPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CrosshairSnapPolicy) {
        self.policy = policy;
    }

    #[must_use]
    pub fn state(&self) -> Option<CrosshairState> {
        self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.is_some_and(|state| state.is_visible)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Tick to paint at `now_ms`, gliding from the previous one.
    #[must_use]
    pub fn animated_tick(&self, now_ms: i64) -> Option<SeriesEntry> {
        let state = self.state?;
        let Some(previous) = self.previous_tick else {
            return Some(state.tick);
        };
        let progress = if state.animation_duration_ms > 0.0 {
            (now_ms - self.changed_at_ms) as f64 / state.animation_duration_ms
        } else {
            1.0
        };
        Some(Keyframe::new(previous, state.tick, progress).value())
    }

    pub fn on_long_press_start(
        &mut self,
        position: PixelPoint,
        time_ms: i64,
        series: &Series,
        axis: &mut XAxisModel,
        price_scale: PriceScale,
    ) -> CrosshairUpdate {
        self.dragging = true;
        self.velocity.reset();
        self.velocity.add(time_ms, position);
        axis.set_scroll_blocked(true);
        let update = self.track(position, time_ms, series, axis, price_scale);
        self.update_auto_pan(position, axis);
        update
    }

    pub fn on_long_press_move(
        &mut self,
        position: PixelPoint,
        time_ms: i64,
        series: &Series,
        axis: &mut XAxisModel,
        price_scale: PriceScale,
    ) -> CrosshairUpdate {
        if !self.dragging {
            return CrosshairUpdate::default();
        }
        self.velocity.add(time_ms, position);
        let update = self.track(position, time_ms, series, axis, price_scale);
        self.update_auto_pan(position, axis);
        update
    }

    pub fn on_long_press_end(&mut self, axis: &mut XAxisModel) -> CrosshairUpdate {
        if self.dragging {
            self.dragging = false;
            axis.set_pan_speed(0.0);
            axis.set_scroll_blocked(false);
        }
        self.hide()
    }

    pub fn on_hover(
        &mut self,
        position: PixelPoint,
        time_ms: i64,
        series: &Series,
        axis: &XAxisModel,
        price_scale: PriceScale,
    ) -> CrosshairUpdate {
        if self.dragging {
            return CrosshairUpdate::default();
        }
        self.velocity.add(time_ms, position);
        self.track(position, time_ms, series, axis, price_scale)
    }

    pub fn on_hover_exit(&mut self) -> CrosshairUpdate {
        if self.dragging {
            return CrosshairUpdate::default();
        }
        self.hide()
    }

    /// Re-resolves the tick under a still cursor after the viewport or the
    /// data moved underneath it.
    pub fn refresh(
        &mut self,
        time_ms: i64,
        series: &Series,
        axis: &XAxisModel,
        price_scale: PriceScale,
    ) -> CrosshairUpdate {
        match self.state {
            Some(state) => self.track(state.cursor_position, time_ms, series, axis, price_scale),
            None => CrosshairUpdate::default(),
        }
    }

    fn track(
        &mut self,
        position: PixelPoint,
        time_ms: i64,
        series: &Series,
        axis: &XAxisModel,
        price_scale: PriceScale,
    ) -> CrosshairUpdate {
        let epoch = axis.epoch_from_x(position.x);
        let Some((tick, within)) =
            find_tick_for_crosshair(series, epoch, position.y, price_scale, self.policy)
        else {
            return self.hide();
        };

        let duration = crosshair_animation_duration_ms(self.velocity.velocity().x);
        match self.state {
            Some(previous) if previous.tick != tick => {
                self.previous_tick = self.animated_tick(time_ms);
                self.changed_at_ms = time_ms;
            }
            Some(_) => {}
            None => {
                trace!(epoch, "crosshair shown");
                self.previous_tick = None;
                self.changed_at_ms = time_ms;
            }
        }
        self.state = Some(CrosshairState {
            tick,
            cursor_position: position,
            is_visible: true,
            show_details: within,
            is_tick_within_data_range: within,
            animation_duration_ms: duration,
        });

        self.emit(within.then_some(tick))
    }

    fn hide(&mut self) -> CrosshairUpdate {
        if self.state.take().is_some() {
            trace!("crosshair hidden");
        }
        self.previous_tick = None;
        self.velocity.reset();
        self.emit(None)
    }

    /// Deduplicates on the snapped entry, so an in-place update of the same
    /// candle is still reported.
    fn emit(&mut self, tick: Option<SeriesEntry>) -> CrosshairUpdate {
        if tick == self.last_emitted {
            return CrosshairUpdate::default();
        }
        self.last_emitted = tick;
        CrosshairUpdate {
            tick_changed: Some(tick),
        }
    }

    fn update_auto_pan(&self, position: PixelPoint, axis: &mut XAxisModel) {
        let width = axis.width_px();
        let speed = if position.x < AUTO_PAN_EDGE_PX {
            -AUTO_PAN_SPEED_PX_PER_MS
        } else if position.x > width - AUTO_PAN_EDGE_PX {
            AUTO_PAN_SPEED_PX_PER_MS
        } else {
            0.0
        };
        axis.set_pan_speed(speed);
    }
}

#[cfg(test)]
mod tests {
    use super::{CrosshairController, CrosshairSnapPolicy, find_tick_for_crosshair};
    use crate::axis::{ViewingMode, XAxisConfig, XAxisModel, XAxisUpdate};
    use crate::core::{Candle, PixelPoint, PriceScale, Series, SeriesEntry, Tick, VerticalPadding};

    fn series() -> Series {
        Series::line(vec![
            Tick::new(1_000, 10.0),
            Tick::new(2_000, 11.0),
            Tick::new(3_000, 12.0),
        ])
        .expect("valid series")
    }

    fn price_scale() -> PriceScale {
        PriceScale::new(20.0, 0.0, 200.0, VerticalPadding::default())
    }

    #[test]
    fn snaps_to_nearest_inside_range_and_virtual_outside() {
        let series = series();
        let (tick, within) = find_tick_for_crosshair(
            &series,
            2_600,
            50.0,
            price_scale(),
            CrosshairSnapPolicy::WithinDataRange,
        )
        .expect("tick");
        assert_eq!(tick.epoch(), 3_000);
        assert!(within);

        let (virtual_tick, within) = find_tick_for_crosshair(
            &series,
            5_000,
            50.0,
            price_scale(),
            CrosshairSnapPolicy::WithinDataRange,
        )
        .expect("tick");
        assert_eq!(virtual_tick.epoch(), 5_000);
        assert!((virtual_tick.quote() - price_scale().quote_from_y(50.0)).abs() <= 1e-12);
        assert!(!within);
    }

    #[test]
    fn empty_series_has_no_crosshair_tick() {
        let empty = Series::line(Vec::new()).expect("empty");
        assert!(
            find_tick_for_crosshair(&empty, 0, 0.0, price_scale(), CrosshairSnapPolicy::Always)
                .is_none()
        );
    }

    #[test]
    fn drag_near_edge_auto_pans_and_release_restores_viewport() {
        let series = series();
        let mut axis = XAxisModel::new(XAxisConfig::default(), 400.0, 3_000);
        let _ = axis.update(XAxisUpdate {
            granularity_ms: Some(0),
            entries: Some(&series.epochs()),
            ..XAxisUpdate::default()
        });
        let mut crosshair = CrosshairController::default();

        // The latest entry sits 150px from the right edge.
        let shown = crosshair.on_long_press_start(
            PixelPoint::new(250.0, 50.0),
            0,
            &series,
            &mut axis,
            price_scale(),
        );
        assert!(shown.tick_changed.is_some());
        assert!(axis.is_scroll_blocked());
        assert_eq!(axis.pan_speed_px_per_ms(), 0.0);

        let moved = crosshair.on_long_press_move(
            PixelPoint::new(10.0, 50.0),
            50,
            &series,
            &mut axis,
            price_scale(),
        );
        assert_eq!(moved.tick_changed, Some(None));
        assert!(axis.pan_speed_px_per_ms() < 0.0);
        assert_eq!(axis.viewing_mode(), ViewingMode::ConstantScrollSpeed);

        let hidden = crosshair.on_long_press_end(&mut axis);
        assert!(!crosshair.is_visible());
        assert!(!axis.is_scroll_blocked());
        assert_eq!(axis.pan_speed_px_per_ms(), 0.0);
        // Leaving the data range already reported `None`.
        assert_eq!(hidden.tick_changed, None);
    }

    #[test]
    fn tick_changed_is_deduplicated_by_epoch() {
        let series = series();
        let axis = XAxisModel::new(XAxisConfig::default(), 400.0, 3_000);
        let mut crosshair = CrosshairController::default();
        let x = axis.x_from_epoch(2_000);

        let first = crosshair.on_hover(PixelPoint::new(x, 10.0), 0, &series, &axis, price_scale());
        let second =
            crosshair.on_hover(PixelPoint::new(x + 1.0, 90.0), 16, &series, &axis, price_scale());
        assert_eq!(first.tick_changed.flatten().map(|tick| tick.epoch()), Some(2_000));
        assert_eq!(second.tick_changed, None);
    }

    #[test]
    fn vertical_motion_keeps_the_fast_snap_duration() {
        let series = series();
        let axis = XAxisModel::new(XAxisConfig::default(), 400.0, 3_000);
        let mut crosshair = CrosshairController::default();
        let x = axis.x_from_epoch(2_000);

        for step in 0..6_i32 {
            let y = 10.0 + 20.0 * f64::from(step);
            let _ = crosshair.on_hover(
                PixelPoint::new(x, y),
                i64::from(step) * 20,
                &series,
                &axis,
                price_scale(),
            );
        }
        let state = crosshair.state().expect("visible");
        assert_eq!(state.animation_duration_ms, 5.0);

        let mut crosshair = CrosshairController::default();
        for step in 0..6_i32 {
            let _ = crosshair.on_hover(
                PixelPoint::new(x - 4.0 * f64::from(step), 50.0),
                i64::from(step) * 20,
                &series,
                &axis,
                price_scale(),
            );
        }
        let state = crosshair.state().expect("visible");
        assert_eq!(state.animation_duration_ms, 80.0);
    }

    #[test]
    fn in_place_candle_update_is_reported() {
        let mut series = Series::candles(vec![
            Candle::new(0, 10.0, 11.0, 9.0, 10.5).expect("candle"),
            Candle::new(60_000, 10.5, 12.0, 10.0, 11.0).expect("candle"),
            Candle::new(120_000, 11.0, 12.0, 9.0, 11.5).expect("candle"),
        ])
        .expect("valid series");
        let axis = XAxisModel::new(XAxisConfig::default(), 400.0, 180_000);
        let mut crosshair = CrosshairController::new(CrosshairSnapPolicy::Always);
        let position = PixelPoint::new(axis.x_from_epoch(120_000), 50.0);

        let shown = crosshair.on_hover(position, 0, &series, &axis, price_scale());
        assert_eq!(
            shown.tick_changed.flatten().map(SeriesEntry::epoch),
            Some(120_000)
        );

        let _ = series.apply_live_tick(Tick::new(130_000, 15.0), 60_000);
        let refreshed = crosshair.refresh(16, &series, &axis, price_scale());
        let Some(Some(SeriesEntry::Candle(candle))) = refreshed.tick_changed else {
            panic!("expected the updated candle to be reported");
        };
        assert_eq!(candle.epoch, 120_000);
        assert_eq!(candle.close, 15.0);
        assert_eq!(candle.high, 15.0);

        let unchanged = crosshair.refresh(32, &series, &axis, price_scale());
        assert_eq!(unchanged.tick_changed, None);
    }
}
