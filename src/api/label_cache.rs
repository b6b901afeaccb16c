use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Label width used when no estimate can be made.
pub const DEFAULT_LABEL_WIDTH_PX: f64 = 60.0;

/// Average glyph advance as a share of the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.62;

/// Runtime metrics exposed by the in-engine label-width cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelWidthCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Estimated label widths keyed by glyph count and font size.
///
/// Lives in the engine so repeated quote labels of the same length skip the
/// estimate.
#[derive(Debug, Default)]
pub(super) struct LabelWidthCache {
    widths: HashMap<(usize, OrderedFloat<f64>, OrderedFloat<f64>), f64>,
    hits: u64,
    misses: u64,
}

impl LabelWidthCache {
    /// Box width for `text`, padding included on both sides.
    pub(super) fn width_for(&mut self, text: &str, font_size_px: f64, padding_px: f64) -> f64 {
        let glyphs = text.chars().count();
        if glyphs == 0 || !font_size_px.is_finite() || font_size_px <= 0.0 {
            return DEFAULT_LABEL_WIDTH_PX;
        }
        let padding_px = if padding_px.is_finite() {
            padding_px.max(0.0)
        } else {
            0.0
        };

        let key = (glyphs, OrderedFloat(font_size_px), OrderedFloat(padding_px));
        if let Some(width) = self.widths.get(&key) {
            self.hits += 1;
            return *width;
        }
        self.misses += 1;
        let width = glyphs as f64 * font_size_px * GLYPH_WIDTH_RATIO + 2.0 * padding_px;
        self.widths.insert(key, width);
        width
    }

    #[must_use]
    pub(super) fn stats(&self) -> LabelWidthCacheStats {
        LabelWidthCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.widths.len(),
        }
    }

    pub(super) fn clear(&mut self) {
        self.widths.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LABEL_WIDTH_PX, LabelWidthCache};

    #[test]
    fn same_length_labels_hit_the_cache() {
        let mut cache = LabelWidthCache::default();
        let first = cache.width_for("101.25", 10.0, 4.0);
        let second = cache.width_for("999.99", 10.0, 4.0);
        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn degenerate_input_uses_default_width() {
        let mut cache = LabelWidthCache::default();
        assert_eq!(cache.width_for("", 10.0, 4.0), DEFAULT_LABEL_WIDTH_PX);
        assert_eq!(cache.width_for("1.0", f64::NAN, 4.0), DEFAULT_LABEL_WIDTH_PX);
        assert_eq!(cache.stats().size, 0);
    }
}
