use serde::{Deserialize, Serialize};

use crate::core::gaps::GapManager;
use crate::core::primitives::round_epoch;

/// Horizontal epoch <-> pixel mapping anchored at the canvas right edge.
///
/// Pixel distance between two epochs is their gap-free duration divided by
/// `ms_per_px`; the mapping extrapolates past `right_bound_epoch` with the same
/// scale so not-yet-arrived epochs have stable coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    ms_per_px: f64,
    right_bound_epoch: i64,
    width_px: f64,
}

impl TimeScale {
    #[must_use]
    pub fn new(ms_per_px: f64, right_bound_epoch: i64, width_px: f64) -> Self {
        Self {
            ms_per_px: if ms_per_px.is_finite() && ms_per_px > 0.0 {
                ms_per_px
            } else {
                1.0
            },
            right_bound_epoch,
            width_px: width_px.max(0.0),
        }
    }

    #[must_use]
    pub fn ms_per_px(self) -> f64 {
        self.ms_per_px
    }

    #[must_use]
    pub fn right_bound_epoch(self) -> i64 {
        self.right_bound_epoch
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        self.width_px
    }

    #[must_use]
    pub fn left_bound_epoch(self, gaps: &GapManager) -> i64 {
        self.epoch_from_x(0.0, gaps)
    }

    /// Signed pixel distance from `start` to `end` (negative when `end < start`).
    #[must_use]
    pub fn px_between(self, start: i64, end: i64, gaps: &GapManager) -> f64 {
        gaps.remove_gaps(start, end) as f64 / self.ms_per_px
    }

    /// Gap-free duration covered by `px` pixels.
    #[must_use]
    pub fn ms_from_px(self, px: f64) -> f64 {
        px * self.ms_per_px
    }

    /// Epoch `px` pixels away from `epoch` (gap-aware).
    #[must_use]
    pub fn shift_epoch(self, epoch: i64, px: f64, gaps: &GapManager) -> i64 {
        if px == 0.0 {
            return epoch;
        }
        round_epoch(gaps.shift_epoch(epoch as f64, self.ms_from_px(px)))
    }

    #[must_use]
    pub fn x_from_epoch(self, epoch: i64, gaps: &GapManager) -> f64 {
        self.width_px - self.px_between(epoch, self.right_bound_epoch, gaps)
    }

    #[must_use]
    pub fn epoch_from_x(self, x: f64, gaps: &GapManager) -> i64 {
        self.shift_epoch(self.right_bound_epoch, x - self.width_px, gaps)
    }
}

#[cfg(test)]
mod tests {
    use super::TimeScale;
    use crate::core::gaps::{GapManager, TimeGap};

    #[test]
    fn right_bound_maps_to_canvas_width() {
        let scale = TimeScale::new(10.0, 10_000, 500.0);
        let gaps = GapManager::default();
        assert_eq!(scale.x_from_epoch(10_000, &gaps), 500.0);
        assert_eq!(scale.x_from_epoch(5_000, &gaps), 0.0);
        assert_eq!(scale.x_from_epoch(11_000, &gaps), 600.0);
        assert_eq!(scale.left_bound_epoch(&gaps), 5_000);
    }

    #[test]
    fn gap_takes_no_horizontal_space() {
        let scale = TimeScale::new(10.0, 10_000, 500.0);
        let gaps = GapManager::new(vec![TimeGap::new(6_000, 8_000)]);
        assert_eq!(scale.x_from_epoch(8_000, &gaps), 300.0);
        assert_eq!(scale.x_from_epoch(6_000, &gaps), 300.0);
        assert_eq!(scale.x_from_epoch(5_000, &gaps), 200.0);
        assert_eq!(scale.epoch_from_x(200.0, &gaps), 5_000);
    }
}
