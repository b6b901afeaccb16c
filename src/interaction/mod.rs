mod crosshair;
mod gesture;
mod gesture_bus;
mod velocity;

use serde::{Deserialize, Serialize};

pub use crosshair::{
    AUTO_PAN_EDGE_PX, AUTO_PAN_SPEED_PX_PER_MS, CrosshairController, CrosshairSnapPolicy,
    CrosshairState, CrosshairUpdate, find_tick_for_crosshair,
};
pub use gesture::{
    Gesture, GestureConfig, GestureEvent, GestureKind, GestureRecognizer, PointerEvent,
    PointerPhase, ScaleEndDetails, ScaleStartDetails, ScaleUpdateDetails,
};
pub use gesture_bus::{GestureBus, SubscriberId};
pub use velocity::{VelocityTracker, crosshair_animation_duration_ms};

/// Tuning for deterministic kinetic pan stepping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticPanConfig {
    /// Multiplicative velocity decay per second.
    pub decay_per_second: f64,
    /// Kinetic pan stops when `abs(velocity)` drops below this threshold.
    pub stop_velocity_abs: f64,
    /// Flings slower than this (px/s) do not start kinetic pan.
    pub min_start_velocity_abs: f64,
}

impl Default for KineticPanConfig {
    fn default() -> Self {
        Self {
            decay_per_second: 0.02,
            stop_velocity_abs: 20.0,
            min_start_velocity_abs: 100.0,
        }
    }
}

/// Kinetic pan runtime state, velocity in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KineticPanState {
    pub active: bool,
    pub velocity_px_per_sec: f64,
}

impl KineticPanState {
    pub fn start(&mut self, config: KineticPanConfig, velocity_px_per_sec: f64) {
        if !velocity_px_per_sec.is_finite()
            || velocity_px_per_sec.abs() < config.min_start_velocity_abs
        {
            self.stop();
            return;
        }
        self.active = true;
        self.velocity_px_per_sec = velocity_px_per_sec;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.velocity_px_per_sec = 0.0;
    }

    /// Advances kinetic pan and returns the pixel displacement to apply.
    ///
    /// Returns `None` when kinetic pan is not active.
    pub fn step(&mut self, config: KineticPanConfig, delta_seconds: f64) -> Option<f64> {
        if !self.active {
            return None;
        }

        let displacement = self.velocity_px_per_sec * delta_seconds;
        let decay = config.decay_per_second.powf(delta_seconds);
        self.velocity_px_per_sec *= decay;

        if self.velocity_px_per_sec.abs() < config.stop_velocity_abs {
            self.stop();
        }

        Some(displacement)
    }
}
