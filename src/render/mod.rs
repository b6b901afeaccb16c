mod frame;
mod null_renderer;
mod paint_context;
mod primitives;
mod style;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use paint_context::PaintContext;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use style::RenderStyle;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
