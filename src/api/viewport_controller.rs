use tracing::debug;

use crate::axis::{ViewingMode, VisibleArea, XAxisModel};
use crate::core::{ChartTransform, PriceScale, VerticalPadding};
use crate::error::ChartResult;
use crate::render::Renderer;

use super::ChartEngine;
use super::validation::validate_vertical_padding;

impl<R: Renderer> ChartEngine<R> {
    /// Brings the latest entry back into view, keeping its current distance
    /// from the right edge when it is already visible.
    pub fn scroll_to_last_tick(&mut self, animate: bool) {
        if self.core.runtime.disposed {
            return;
        }
        self.core.x_axis.scroll_to_last_tick(animate, false);
    }

    /// Like [`ChartEngine::scroll_to_last_tick`] but restores the initial
    /// current-tick offset.
    pub fn reset_to_last_tick(&mut self, animate: bool) {
        if self.core.runtime.disposed {
            return;
        }
        self.core.x_axis.scroll_to_last_tick(animate, true);
    }

    /// Zooms by `factor` (> 1 zooms in) around the canvas center, or around
    /// "now" while following the current tick.
    pub fn scale(&mut self, factor: f64) {
        if self.core.runtime.disposed {
            return;
        }
        self.core.x_axis.scale_by(factor);
    }

    /// Pans by `px`; positive values move towards newer data.
    pub fn scroll_by(&mut self, px: f64) {
        if self.core.runtime.disposed {
            return;
        }
        self.core.x_axis.scroll_by(px);
    }

    #[must_use]
    pub fn x_from_epoch(&self, epoch: i64) -> f64 {
        self.core.x_axis.x_from_epoch(epoch)
    }

    #[must_use]
    pub fn epoch_from_x(&self, x: f64) -> i64 {
        self.core.x_axis.epoch_from_x(x)
    }

    /// Maps a quote through the bounds painted at the latest frame.
    #[must_use]
    pub fn quote_to_y(&self, quote: f64) -> f64 {
        self.current_price_scale().quote_to_y(quote)
    }

    #[must_use]
    pub fn quote_from_y(&self, y: f64) -> f64 {
        self.current_price_scale().quote_from_y(y)
    }

    /// Switches data-fit on or off. Returns the new state.
    pub fn toggle_data_fit_mode(&mut self) -> bool {
        if self.core.runtime.disposed {
            debug!("toggle_data_fit_mode ignored after dispose");
            return self.core.x_axis.is_data_fit_enabled();
        }
        self.core.x_axis.toggle_data_fit();
        let enabled = self.core.x_axis.is_data_fit_enabled();
        debug!(enabled, "data fit toggled");
        enabled
    }

    /// Blocks or unblocks user scrolling. Returns the new state.
    pub fn toggle_scroll_block(&mut self) -> bool {
        if self.core.runtime.disposed {
            debug!("toggle_scroll_block ignored after dispose");
            return self.core.x_axis.is_scroll_blocked();
        }
        let blocked = !self.core.x_axis.is_scroll_blocked();
        self.core.x_axis.set_scroll_blocked(blocked);
        debug!(blocked, "scroll block toggled");
        blocked
    }

    /// Manual y-axis drag: dragging down grows the vertical padding.
    pub fn drag_quote_axis(&mut self, dy_px: f64) {
        if self.core.runtime.disposed {
            debug!("drag_quote_axis ignored after dispose");
            return;
        }
        let height = self.core.config.viewport.height;
        self.core.presentation.vertical_padding.drag_by(dy_px, height);
    }

    #[must_use]
    pub fn vertical_padding(&self) -> VerticalPadding {
        self.core.presentation.vertical_padding
    }

    pub fn set_vertical_padding(&mut self, padding: VerticalPadding) -> ChartResult<()> {
        if self.core.runtime.disposed {
            debug!("set_vertical_padding ignored after dispose");
            return Ok(());
        }
        self.core.presentation.vertical_padding = validate_vertical_padding(padding)?;
        Ok(())
    }

    #[must_use]
    pub fn visible_area(&self) -> VisibleArea {
        self.core.x_axis.visible_area()
    }

    #[must_use]
    pub fn viewing_mode(&self) -> ViewingMode {
        self.core.x_axis.viewing_mode()
    }

    /// `(bottom, top)` quote bounds painted at the latest frame.
    #[must_use]
    pub fn quote_bounds(&self) -> (f64, f64) {
        self.core
            .animation
            .quote_bounds
            .current(self.core.runtime.now_ms)
    }

    #[must_use]
    pub fn x_axis(&self) -> &XAxisModel {
        &self.core.x_axis
    }

    pub(super) fn price_scale_at(&self, now_ms: i64) -> PriceScale {
        let (bottom, top) = self.core.animation.quote_bounds.current(now_ms);
        PriceScale::new(
            top,
            bottom,
            self.core.config.viewport.height,
            self.core.presentation.vertical_padding,
        )
    }

    pub(super) fn current_price_scale(&self) -> PriceScale {
        self.price_scale_at(self.core.runtime.now_ms)
    }

    pub(super) fn transform_at(&self, now_ms: i64) -> ChartTransform<'_> {
        ChartTransform::new(
            self.core.x_axis.time_scale(),
            self.price_scale_at(now_ms),
            self.core.x_axis.gaps(),
        )
    }
}
