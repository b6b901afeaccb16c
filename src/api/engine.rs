use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{RenderStyle, Renderer};

use super::engine_core::EngineCore;
use super::validation::{validate_render_style, validate_viewport};
use super::ChartEngineConfig;

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` coordinates the viewport model, animated quote bounds,
/// crosshair, series data and renderer calls. It is driven by one frame
/// clock: hosts call [`ChartEngine::on_frame`] with the current wall-clock
/// epoch for every display refresh.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) core: EngineCore,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.core.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.config.viewport
    }

    /// Resizes the canvas.
    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        validate_viewport(viewport)?;
        self.core.config.viewport = viewport;
        self.core.x_axis.set_width(viewport.width);
        Ok(())
    }

    #[must_use]
    pub fn render_style(&self) -> RenderStyle {
        self.core.presentation.render_style
    }

    pub fn set_render_style(&mut self, style: RenderStyle) -> ChartResult<()> {
        validate_render_style(style)?;
        self.core.presentation.render_style = style;
        self.core.config.style = style;
        self.core.presentation.label_widths.borrow_mut().clear();
        Ok(())
    }

    #[must_use]
    pub fn pip_size(&self) -> u32 {
        self.core.presentation.pip_size
    }

    /// Decimal places of quote labels; display only.
    pub fn set_pip_size(&mut self, pip_size: u32) {
        self.core.presentation.pip_size = pip_size.min(12);
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
