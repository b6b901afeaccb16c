use tracing::trace;

use crate::interaction::{ScaleEndDetails, ScaleStartDetails, ScaleUpdateDetails};

use super::{ViewingMode, XAxisModel};

impl XAxisModel {
    /// Captures the scale reference for the gesture and cancels anything
    /// that would fight the user for the viewport.
    pub fn on_scale_start(&mut self, details: ScaleStartDetails) {
        trace!(
            focal_x = details.focal_point.x,
            pointers = details.pointer_count,
            "x-axis scale start"
        );
        self.prev_ms_per_px = self.ms_per_px;
        self.disable_data_fit();
        self.scroll_animation = None;
        self.kinetic.stop();
    }

    /// Applies pinch scale and horizontal pan.
    ///
    /// While following the current tick the scale keeps "now" fixed on
    /// screen; otherwise the focal point stays under the fingers.
    pub fn on_scale_update(&mut self, details: ScaleUpdateDetails) {
        if self.scroll_blocked {
            return;
        }

        if details.scale.is_finite() && details.scale > 0.0 && details.scale != 1.0 {
            if self.viewing_mode() == ViewingMode::FollowCurrentTick {
                self.scale_with_now_fixed(details.scale);
            } else {
                self.scale_with_focal_point_fixed(details.scale, details.focal_point.x);
            }
        }

        self.scroll_by(-details.focal_point_delta.x);
    }

    /// Starts kinetic pan from a single-pointer fling.
    pub fn on_scale_end(&mut self, details: ScaleEndDetails) {
        if self.scroll_blocked || details.pointer_count != 1 {
            return;
        }
        self.kinetic
            .start(self.config.kinetic_pan, -details.velocity_x_px_per_sec);
    }

    /// Programmatic zoom by `factor` (> 1 zooms in), anchored like a pinch
    /// centered on the canvas.
    pub fn scale_by(&mut self, factor: f64) {
        if self.scroll_blocked || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.prev_ms_per_px = self.ms_per_px;
        self.disable_data_fit();
        if self.viewing_mode() == ViewingMode::FollowCurrentTick {
            self.scale_with_now_fixed(factor);
        } else {
            self.scale_with_focal_point_fixed(factor, self.width_px / 2.0);
        }
    }

    /// Scrolls by `px` (positive moves towards newer data).
    pub fn scroll_by(&mut self, px: f64) {
        if self.scroll_blocked {
            return;
        }
        self.shift_right_bound(px);
    }

    fn scale_with_now_fixed(&mut self, scale: f64) {
        let now_x = self.x_from_epoch(self.now_epoch);
        self.set_ms_per_px(self.prev_ms_per_px / scale);
        let right_bound = self.shift_epoch(self.now_epoch, self.width_px - now_x);
        self.scroll_to(right_bound);
    }

    fn scale_with_focal_point_fixed(&mut self, scale: f64, focal_x: f64) {
        let focal_epoch = self.epoch_from_x(focal_x);
        self.set_ms_per_px(self.prev_ms_per_px / scale);
        let right_bound = self.shift_epoch(focal_epoch, self.width_px - focal_x);
        self.scroll_to(right_bound);
    }
}

#[cfg(test)]
mod tests {
    use crate::axis::{XAxisConfig, XAxisModel, XAxisUpdate};
    use crate::core::PixelPoint;
    use crate::interaction::{ScaleEndDetails, ScaleStartDetails, ScaleUpdateDetails};

    fn stationary_model() -> XAxisModel {
        let entries: Vec<i64> = (0..500).map(|i| i * 1_000).collect();
        let mut model = XAxisModel::new(XAxisConfig::default(), 1_000.0, 499_000);
        let _ = model.update(XAxisUpdate {
            is_live: Some(false),
            granularity_ms: Some(0),
            entries: Some(&entries),
            min_epoch: Some(0),
            max_epoch: Some(499_000),
        });
        model
    }

    fn pinch(scale: f64, x: f64) -> ScaleUpdateDetails {
        ScaleUpdateDetails {
            focal_point: PixelPoint::new(x, 100.0),
            focal_point_delta: PixelPoint::new(0.0, 0.0),
            scale,
            pointer_count: 2,
        }
    }

    #[test]
    fn focal_point_epoch_stays_under_the_fingers() {
        let mut model = stationary_model();
        model.scroll_by(-400.0);
        let focal_epoch = model.epoch_from_x(500.0);

        model.on_scale_start(ScaleStartDetails {
            focal_point: PixelPoint::new(500.0, 100.0),
            pointer_count: 2,
        });
        model.on_scale_update(pinch(2.0, 500.0));

        assert!((model.ms_per_px() - 25.0).abs() <= 1e-9);
        assert!((model.x_from_epoch(focal_epoch) - 500.0).abs() <= 1.0);
    }

    #[test]
    fn scale_is_clamped_to_interval_width_limits() {
        let mut model = stationary_model();
        model.on_scale_start(ScaleStartDetails {
            focal_point: PixelPoint::new(500.0, 100.0),
            pointer_count: 2,
        });
        model.on_scale_update(pinch(1_000.0, 500.0));
        assert!((model.ms_per_px() - model.min_ms_per_px()).abs() <= 1e-12);

        model.on_scale_update(pinch(0.0001, 500.0));
        assert!((model.ms_per_px() - model.max_ms_per_px()).abs() <= 1e-12);
    }

    #[test]
    fn blocked_scroll_ignores_drag_and_fling() {
        let mut model = stationary_model();
        let before = model.right_bound_epoch();
        model.set_scroll_blocked(true);
        model.scroll_by(-300.0);
        model.on_scale_end(ScaleEndDetails {
            velocity_x_px_per_sec: 4_000.0,
            pointer_count: 1,
        });
        assert_eq!(model.right_bound_epoch(), before);
        assert!(!model.kinetic_pan_state().active);
    }

    #[test]
    fn single_pointer_fling_scrolls_opposite_to_finger_velocity() {
        let mut model = stationary_model();
        model.scroll_by(-2_000.0);
        model.on_scale_end(ScaleEndDetails {
            velocity_x_px_per_sec: 2_000.0,
            pointer_count: 1,
        });
        let state = model.kinetic_pan_state();
        assert!(state.active);
        assert!(state.velocity_px_per_sec < 0.0);
    }
}
