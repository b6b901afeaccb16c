use tracing::debug;

use crate::core::SeriesEntry;
use crate::extensions::{ChartContext, ChartEvent};
use crate::interaction::CrosshairUpdate;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    pub(super) fn listener_context(&self) -> ChartContext {
        let core = &self.core;
        ChartContext {
            viewport: core.config.viewport,
            visible_area: core.x_axis.visible_area(),
            quote_bounds: core.animation.quote_bounds.current(core.runtime.now_ms),
            entries_len: core.model.entries_len(),
            viewing_mode: core.x_axis.viewing_mode(),
            is_live: core.model.is_live,
        }
    }

    pub(super) fn emit_event(&mut self, event: ChartEvent) {
        if self.core.runtime.disposed {
            debug!(?event, "dropping event after dispose");
            return;
        }
        let context = self.listener_context();
        for listener in &mut self.core.runtime.listeners {
            listener.on_event(event, context);
        }
    }

    pub(super) fn emit_crosshair_update(&mut self, update: CrosshairUpdate) {
        if let Some(tick) = update.tick_changed {
            self.emit_crosshair_tick_changed(tick);
        }
    }

    fn emit_crosshair_tick_changed(&mut self, tick: Option<SeriesEntry>) {
        self.emit_event(ChartEvent::CrosshairTickChanged { tick });
    }

    /// Reports the visible epoch window when it moved since the last report.
    pub(super) fn emit_visible_area_if_changed(&mut self) {
        let area = self.core.x_axis.visible_area();
        if self.core.runtime.last_visible_area == Some(area) {
            return;
        }
        self.core.runtime.last_visible_area = Some(area);
        self.emit_event(ChartEvent::VisibleAreaChanged {
            left_epoch: area.left_epoch,
            right_epoch: area.right_epoch,
        });
    }

    /// Reports the painted quote bounds when they moved since the last report.
    pub(super) fn emit_quote_area_if_changed(&mut self) {
        let (bottom, top) = self
            .core
            .animation
            .quote_bounds
            .current(self.core.runtime.now_ms);
        if self.core.runtime.last_quote_area == Some((bottom, top)) {
            return;
        }
        self.core.runtime.last_quote_area = Some((bottom, top));
        self.emit_event(ChartEvent::QuoteAreaChanged {
            top_quote: top,
            bottom_quote: bottom,
        });
    }
}
