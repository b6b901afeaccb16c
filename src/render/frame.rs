use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Layers are filled in paint order: series geometry, annotations, the
/// current-tick indicator, then the crosshair. Backends draw rects, then
/// lines, then circles, then texts; within each list, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    /// Frame clock the scene was materialized at.
    pub now_ms: i64,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, now_ms: i64) -> Self {
        Self {
            viewport,
            now_ms,
            lines: Vec::new(),
            rects: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Total number of primitives across all layers.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.rects.len() + self.circles.len() + self.texts.len()
    }

    /// Lines drawn with a dash pattern (barriers, crosshair guides).
    pub fn dashed_lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.lines.iter().filter(|line| line.dashed)
    }

    /// Rejects frames a backend could not draw: a degenerate viewport or any
    /// primitive with non-finite geometry.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        self.lines.iter().try_for_each(|line| line.validate())?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.circles.iter().try_for_each(|circle| circle.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }
}
