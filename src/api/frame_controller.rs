use tracing::trace;

use crate::error::ChartResult;
use crate::extensions::ChartEvent;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Advances every time-driven state to `now_ms` and renders one frame.
    ///
    /// `now_ms` is the wall-clock epoch in milliseconds; a value older than
    /// the previous frame is treated as the previous frame time.
    pub fn on_frame(&mut self, now_ms: i64) -> ChartResult<()> {
        if self.core.runtime.disposed {
            trace!(now_ms, "frame skipped after dispose");
            return Ok(());
        }
        self.advance(now_ms);
        self.render()
    }

    /// Advances every time-driven state to `now_ms` without rendering.
    ///
    /// Order: recognizer timers, viewport, quote bounds, crosshair, blink,
    /// then change notifications.
    pub fn advance(&mut self, now_ms: i64) {
        if self.core.runtime.disposed {
            return;
        }
        let now_ms = now_ms.max(self.core.runtime.now_ms);
        self.core.runtime.now_ms = now_ms;

        self.poll_gestures(now_ms);
        self.core.x_axis.on_new_frame(now_ms);
        self.update_quote_bounds(now_ms);
        self.refresh_crosshair(now_ms);
        let is_live = self.core.model.is_live;
        let show_blink = self.core.config.show_blink_animation;
        self.core.animation.blink.sync(is_live, show_blink, now_ms);

        self.emit_visible_area_if_changed();
        self.emit_quote_area_if_changed();
    }

    /// Hands the scene for the latest frame time to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        if self.core.runtime.disposed {
            return Ok(());
        }
        let frame = self.build_render_frame();
        trace!(
            now_ms = frame.now_ms,
            primitives = frame.primitive_count(),
            "rendering frame"
        );
        self.renderer.render(&frame)?;
        self.emit_event(ChartEvent::Rendered);
        Ok(())
    }

    fn update_quote_bounds(&mut self, now_ms: i64) {
        let Some((bottom, top)) = self.quote_range_target() else {
            return;
        };
        let duration_ms = self.core.config.quote_bounds_animation_ms;
        self.core
            .animation
            .quote_bounds
            .set_targets(bottom, top, duration_ms, now_ms);
    }

    /// Quote range of the entries around the visible window, widened by the
    /// annotations that must stay on screen.
    fn quote_range_target(&self) -> Option<(f64, f64)> {
        let area = self.core.x_axis.visible_area();
        let series_range = self
            .core
            .model
            .series
            .as_ref()
            .and_then(|series| series.min_max_quote(area.left_epoch, area.right_epoch));
        let pinned_range = self.core.model.annotations.pinned_quote_range();
        match (series_range, pinned_range) {
            (Some((low, high)), Some((pinned_low, pinned_high))) => {
                Some((low.min(pinned_low), high.max(pinned_high)))
            }
            (range, pinned) => range.or(pinned),
        }
    }

    fn refresh_crosshair(&mut self, now_ms: i64) {
        if !self.core.crosshair.is_visible() {
            return;
        }
        let price_scale = self.price_scale_at(now_ms);
        let core = &mut self.core;
        let Some(series) = core.model.series.as_ref() else {
            return;
        };
        let update = core
            .crosshair
            .refresh(now_ms, series, &core.x_axis, price_scale);
        self.emit_crosshair_update(update);
    }
}
