use crate::core::{ChartTransform, SeriesEntry};
use crate::render::RenderStyle;

/// Everything one render pass needs, built fresh for every pass.
#[derive(Debug, Clone, Copy)]
pub struct PaintContext<'a> {
    pub transform: ChartTransform<'a>,
    pub style: &'a RenderStyle,
    pub now_ms: i64,
    /// Progress of the annotation set transition, `[0, 1]`.
    pub annotation_progress: f64,
    /// Blink loop progress; `1.0` when blinking is off.
    pub blink_progress: f64,
    /// Decimal places used for quote labels.
    pub pip_size: u32,
    /// Candle body (or OHLC tick) width in pixels.
    pub candle_body_width_px: f64,
    /// Latest entry mid-transition, drawn in place of the real one.
    pub animated_last_entry: Option<SeriesEntry>,
}

impl<'a> PaintContext<'a> {
    #[must_use]
    pub fn new(transform: ChartTransform<'a>, style: &'a RenderStyle, now_ms: i64) -> Self {
        Self {
            transform,
            style,
            now_ms,
            annotation_progress: 1.0,
            blink_progress: 1.0,
            pip_size: 2,
            candle_body_width_px: 6.0,
            animated_last_entry: None,
        }
    }

    #[must_use]
    pub fn format_quote(&self, quote: f64) -> String {
        format!("{quote:.prec$}", prec = self.pip_size as usize)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.transform.time_scale.width_px()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.transform.price_scale.height_px()
    }
}
