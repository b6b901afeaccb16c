use serde::{Deserialize, Serialize};

use super::Curve;

/// Reverse-repeating loop used for the live current-tick indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkAnimation {
    period_ms: f64,
    enabled: bool,
    started_at_ms: i64,
}

impl BlinkAnimation {
    #[must_use]
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: if period_ms.is_finite() && period_ms > 0.0 {
                period_ms
            } else {
                500.0
            },
            enabled: false,
            started_at_ms: 0,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables the loop only for live charts that asked for it.
    pub fn sync(&mut self, is_live: bool, show_blink_animation: bool, now_ms: i64) {
        let enabled = is_live && show_blink_animation;
        if enabled && !self.enabled {
            self.started_at_ms = now_ms;
        }
        self.enabled = enabled;
    }

    /// Progress in `[0, 1]`, rising for one period then falling for the next.
    ///
    /// A disabled loop reports a constant `1.0` (fully shown, not pulsing).
    #[must_use]
    pub fn progress(&self, now_ms: i64) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        let elapsed = (now_ms - self.started_at_ms).max(0) as f64;
        let phase = (elapsed % (2.0 * self.period_ms)) / self.period_ms;
        let linear = if phase <= 1.0 { phase } else { 2.0 - phase };
        Curve::EaseInOut.transform(linear)
    }
}
