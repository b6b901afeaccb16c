use crate::core::gaps::GapManager;
use crate::core::price_scale::PriceScale;
use crate::core::time_scale::TimeScale;

/// Per-frame coordinate context threaded through projection and paint calls.
///
/// Built once per render pass from the current viewport and animated quote
/// bounds, so every consumer in the pass sees the same mapping.
#[derive(Debug, Clone, Copy)]
pub struct ChartTransform<'a> {
    pub time_scale: TimeScale,
    pub price_scale: PriceScale,
    pub gaps: &'a GapManager,
}

impl<'a> ChartTransform<'a> {
    #[must_use]
    pub fn new(time_scale: TimeScale, price_scale: PriceScale, gaps: &'a GapManager) -> Self {
        Self {
            time_scale,
            price_scale,
            gaps,
        }
    }

    #[must_use]
    pub fn x_from_epoch(&self, epoch: i64) -> f64 {
        self.time_scale.x_from_epoch(epoch, self.gaps)
    }

    #[must_use]
    pub fn epoch_from_x(&self, x: f64) -> i64 {
        self.time_scale.epoch_from_x(x, self.gaps)
    }

    #[must_use]
    pub fn quote_to_y(&self, quote: f64) -> f64 {
        self.price_scale.quote_to_y(quote)
    }

    #[must_use]
    pub fn quote_from_y(&self, y: f64) -> f64 {
        self.price_scale.quote_from_y(y)
    }

    #[must_use]
    pub fn left_bound_epoch(&self) -> i64 {
        self.time_scale.left_bound_epoch(self.gaps)
    }

    #[must_use]
    pub fn right_bound_epoch(&self) -> i64 {
        self.time_scale.right_bound_epoch()
    }
}
