use std::cell::RefCell;

use crate::core::VerticalPadding;
use crate::render::RenderStyle;

use super::label_cache::LabelWidthCache;

/// Runtime presentation state grouped separately from chart data and viewport.
pub(super) struct ChartPresentationState {
    pub(super) render_style: RenderStyle,
    pub(super) pip_size: u32,
    pub(super) vertical_padding: VerticalPadding,
    pub(super) label_widths: RefCell<LabelWidthCache>,
}

impl ChartPresentationState {
    #[must_use]
    pub(super) fn new(
        render_style: RenderStyle,
        pip_size: u32,
        vertical_padding: VerticalPadding,
    ) -> Self {
        Self {
            render_style,
            pip_size,
            vertical_padding,
            label_widths: RefCell::new(LabelWidthCache::default()),
        }
    }
}
