use std::collections::VecDeque;

use crate::core::PixelPoint;

/// Samples older than this are ignored when estimating velocity.
pub const VELOCITY_WINDOW_MS: i64 = 100;

const FAST_DURATION_MS: f64 = 5.0;
const SLOW_DURATION_MS: f64 = 80.0;
const SLOW_SPEED_PX_PER_SEC: f64 = 500.0;
const FAST_SPEED_PX_PER_SEC: f64 = 3_000.0;

/// Pointer velocity over a trailing time window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VelocityTracker {
    samples: VecDeque<(i64, PixelPoint)>,
}

impl VelocityTracker {
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn add(&mut self, time_ms: i64, position: PixelPoint) {
        self.samples.push_back((time_ms, position));
        while self
            .samples
            .front()
            .is_some_and(|&(time, _)| time_ms - time > VELOCITY_WINDOW_MS)
        {
            self.samples.pop_front();
        }
    }

    /// Velocity in px/s between the oldest and newest samples in the window.
    #[must_use]
    pub fn velocity(&self) -> PixelPoint {
        let (Some(&(start_ms, start)), Some(&(end_ms, end))) =
            (self.samples.front(), self.samples.back())
        else {
            return PixelPoint::default();
        };
        let dt_seconds = (end_ms - start_ms) as f64 / 1_000.0;
        if dt_seconds <= 0.0 {
            return PixelPoint::default();
        }
        PixelPoint::new((end.x - start.x) / dt_seconds, (end.y - start.y) / dt_seconds)
    }
}

/// Crosshair snap animation duration for a pointer moving horizontally at
/// `velocity_x_px_per_sec`: slow drags glide, fast drags snap. Vertical
/// motion never changes the snapped epoch, so it is not considered.
#[must_use]
pub fn crosshair_animation_duration_ms(velocity_x_px_per_sec: f64) -> f64 {
    let speed = velocity_x_px_per_sec.abs();
    if speed == 0.0 || !speed.is_finite() || speed >= FAST_SPEED_PX_PER_SEC {
        return FAST_DURATION_MS;
    }
    if speed < SLOW_SPEED_PX_PER_SEC {
        return SLOW_DURATION_MS;
    }
    let t = (speed - SLOW_SPEED_PX_PER_SEC) / (FAST_SPEED_PX_PER_SEC - SLOW_SPEED_PX_PER_SEC);
    SLOW_DURATION_MS + (FAST_DURATION_MS - SLOW_DURATION_MS) * t
}

#[cfg(test)]
mod tests {
    use super::{VelocityTracker, crosshair_animation_duration_ms};
    use crate::core::PixelPoint;

    #[test]
    fn duration_mapping_breakpoints() {
        assert_eq!(crosshair_animation_duration_ms(0.0), 5.0);
        assert_eq!(crosshair_animation_duration_ms(200.0), 80.0);
        assert_eq!(crosshair_animation_duration_ms(3_000.0), 5.0);
        assert_eq!(crosshair_animation_duration_ms(10_000.0), 5.0);
        assert!((crosshair_animation_duration_ms(1_750.0) - 42.5).abs() <= 1e-9);
    }

    #[test]
    fn velocity_uses_trailing_window_only() {
        let mut tracker = VelocityTracker::default();
        tracker.add(0, PixelPoint::new(0.0, 0.0));
        tracker.add(500, PixelPoint::new(1_000.0, 0.0));
        tracker.add(550, PixelPoint::new(1_050.0, 0.0));
        tracker.add(600, PixelPoint::new(1_100.0, 0.0));
        let velocity = tracker.velocity();
        assert!((velocity.x - 1_000.0).abs() <= 1e-9);
        assert_eq!(velocity.y, 0.0);
    }
}
