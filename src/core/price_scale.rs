use serde::{Deserialize, Serialize};

/// Amount added on both sides of a flat quote range.
pub const FLAT_RANGE_EXPANSION: f64 = 2.0;

const MAX_PADDING_FRACTION: f64 = 0.45;

/// Returns `(bottom, top)` with a non-empty span.
///
/// Non-finite input falls back to `(0, 1)`.
#[must_use]
pub fn expand_flat_range(bottom: f64, top: f64) -> (f64, f64) {
    if !bottom.is_finite() || !top.is_finite() {
        return (0.0, 1.0);
    }
    let (bottom, top) = (bottom.min(top), bottom.max(top));
    if bottom == top {
        return (bottom - FLAT_RANGE_EXPANSION, top + FLAT_RANGE_EXPANSION);
    }
    (bottom, top)
}

/// Vertical margin reserved above the top bound and below the bottom bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalPadding {
    /// Fraction of the canvas height.
    pub fraction: f64,
    /// Lower bound in pixels.
    pub min_px: f64,
}

impl Default for VerticalPadding {
    fn default() -> Self {
        Self {
            fraction: 0.1,
            min_px: 16.0,
        }
    }
}

impl VerticalPadding {
    /// Padding in pixels for a canvas of `height_px`, never more than a
    /// `MAX_PADDING_FRACTION` of the height.
    #[must_use]
    pub fn resolve_px(self, height_px: f64) -> f64 {
        if !height_px.is_finite() || height_px <= 0.0 {
            return 0.0;
        }
        (height_px * self.fraction)
            .max(self.min_px)
            .min(height_px * MAX_PADDING_FRACTION)
    }

    /// Manual y-axis drag: dragging down (`dy > 0`) grows the padding and
    /// shrinks the quote area.
    ///
    /// The fraction never drops below the share `min_px` already covers, so
    /// every drag back down has a visible effect.
    pub fn drag_by(&mut self, dy_px: f64, height_px: f64) {
        if !dy_px.is_finite() || !height_px.is_finite() || height_px <= 0.0 {
            return;
        }
        let floor = (self.min_px.max(0.0) / height_px).min(MAX_PADDING_FRACTION);
        self.fraction = (self.fraction + dy_px / height_px).clamp(floor, MAX_PADDING_FRACTION);
    }
}

/// Vertical quote <-> pixel mapping between the (animated) quote bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    top_quote: f64,
    bottom_quote: f64,
    height_px: f64,
    padding_px: f64,
}

impl PriceScale {
    #[must_use]
    pub fn new(top_quote: f64, bottom_quote: f64, height_px: f64, padding: VerticalPadding) -> Self {
        let (bottom_quote, top_quote) = expand_flat_range(bottom_quote, top_quote);
        let height_px = if height_px.is_finite() { height_px.max(0.0) } else { 0.0 };
        Self {
            top_quote,
            bottom_quote,
            height_px,
            padding_px: padding.resolve_px(height_px),
        }
    }

    #[must_use]
    pub fn top_quote(self) -> f64 {
        self.top_quote
    }

    #[must_use]
    pub fn bottom_quote(self) -> f64 {
        self.bottom_quote
    }

    #[must_use]
    pub fn padding_px(self) -> f64 {
        self.padding_px
    }

    #[must_use]
    pub fn height_px(self) -> f64 {
        self.height_px
    }

    fn drawing_height(self) -> f64 {
        (self.height_px - 2.0 * self.padding_px).max(0.0)
    }

    #[must_use]
    pub fn quote_to_y(self, quote: f64) -> f64 {
        let span = self.top_quote - self.bottom_quote;
        let drawing_height = self.drawing_height();
        if drawing_height == 0.0 {
            return self.height_px / 2.0;
        }
        self.padding_px + (self.top_quote - quote) / span * drawing_height
    }

    #[must_use]
    pub fn quote_from_y(self, y: f64) -> f64 {
        let span = self.top_quote - self.bottom_quote;
        let drawing_height = self.drawing_height();
        if drawing_height == 0.0 {
            return (self.top_quote + self.bottom_quote) / 2.0;
        }
        self.top_quote - (y - self.padding_px) / drawing_height * span
    }
}

#[cfg(test)]
mod tests {
    use super::{PriceScale, VerticalPadding, expand_flat_range};

    #[test]
    fn bounds_map_inside_padding() {
        let padding = VerticalPadding {
            fraction: 0.1,
            min_px: 10.0,
        };
        let scale = PriceScale::new(110.0, 10.0, 600.0, padding);
        assert_eq!(scale.quote_to_y(110.0), 60.0);
        assert_eq!(scale.quote_to_y(10.0), 540.0);
        assert!((scale.quote_from_y(300.0) - 60.0).abs() <= 1e-9);
    }

    #[test]
    fn flat_range_is_expanded() {
        assert_eq!(expand_flat_range(5.0, 5.0), (3.0, 7.0));
        assert_eq!(expand_flat_range(7.0, 3.0), (3.0, 7.0));
        assert_eq!(expand_flat_range(f64::NAN, 1.0), (0.0, 1.0));
    }

    #[test]
    fn padding_respects_minimum_and_drag() {
        let mut padding = VerticalPadding {
            fraction: 0.01,
            min_px: 20.0,
        };
        assert_eq!(padding.resolve_px(500.0), 20.0);
        padding.drag_by(50.0, 500.0);
        assert!((padding.fraction - 0.11).abs() <= 1e-12);
        padding.drag_by(-1_000.0, 500.0);
        assert!((padding.fraction - 0.04).abs() <= 1e-12);
        assert!((padding.resolve_px(500.0) - 20.0).abs() <= 1e-9);

        // Dragging back down from the floor grows the padding right away.
        padding.drag_by(5.0, 500.0);
        assert!((padding.resolve_px(500.0) - 25.0).abs() <= 1e-9);
    }
}
