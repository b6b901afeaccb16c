use serde::{Deserialize, Serialize};

use crate::axis::{DataFitPadding, XAxisConfig};
use crate::core::{VerticalPadding, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CrosshairSnapPolicy, GestureConfig, KineticPanConfig};
use crate::render::RenderStyle;

fn default_quote_bounds_animation_ms() -> f64 {
    300.0
}

fn default_current_tick_animation_ms() -> f64 {
    300.0
}

fn default_annotation_animation_ms() -> f64 {
    300.0
}

fn default_show_blink_animation() -> bool {
    true
}

fn default_blink_period_ms() -> f64 {
    500.0
}

fn default_pip_size() -> u32 {
    2
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub x_axis: XAxisConfig,
    /// Duration of the top/bottom quote bound transitions.
    #[serde(default = "default_quote_bounds_animation_ms")]
    pub quote_bounds_animation_ms: f64,
    /// Duration of the latest-entry glide after a live update.
    #[serde(default = "default_current_tick_animation_ms")]
    pub current_tick_animation_ms: f64,
    #[serde(default = "default_annotation_animation_ms")]
    pub annotation_animation_ms: f64,
    #[serde(default = "default_show_blink_animation")]
    pub show_blink_animation: bool,
    #[serde(default = "default_blink_period_ms")]
    pub blink_period_ms: f64,
    #[serde(default)]
    pub crosshair_snap_policy: CrosshairSnapPolicy,
    #[serde(default)]
    pub vertical_padding: VerticalPadding,
    #[serde(default)]
    pub gestures: GestureConfig,
    /// Delays single taps by the double-tap window so double taps can be told
    /// apart. Off by default.
    #[serde(default)]
    pub double_tap_enabled: bool,
    /// Decimal places used for quote labels.
    #[serde(default = "default_pip_size")]
    pub pip_size: u32,
    #[serde(default)]
    pub style: RenderStyle,
}

impl ChartEngineConfig {
    /// Creates a config with default tuning for `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            x_axis: XAxisConfig::default(),
            quote_bounds_animation_ms: default_quote_bounds_animation_ms(),
            current_tick_animation_ms: default_current_tick_animation_ms(),
            annotation_animation_ms: default_annotation_animation_ms(),
            show_blink_animation: default_show_blink_animation(),
            blink_period_ms: default_blink_period_ms(),
            crosshair_snap_policy: CrosshairSnapPolicy::default(),
            vertical_padding: VerticalPadding::default(),
            gestures: GestureConfig::default(),
            double_tap_enabled: false,
            pip_size: default_pip_size(),
            style: RenderStyle::default(),
        }
    }

    #[must_use]
    pub fn with_x_axis_config(mut self, x_axis: XAxisConfig) -> Self {
        self.x_axis = x_axis;
        self
    }

    #[must_use]
    pub fn with_max_current_tick_offset_px(mut self, offset_px: f64) -> Self {
        self.x_axis.max_current_tick_offset_px = offset_px;
        self
    }

    /// Offset applied on first load and on reset; falls back to the max
    /// offset when unset.
    #[must_use]
    pub fn with_initial_current_tick_offset_px(mut self, offset_px: f64) -> Self {
        self.x_axis.initial_current_tick_offset_px = Some(offset_px);
        self
    }

    /// Sets the default, narrowest and widest granularity bucket widths.
    #[must_use]
    pub fn with_interval_widths(mut self, default_px: f64, min_px: f64, max_px: f64) -> Self {
        self.x_axis.default_interval_width_px = default_px;
        self.x_axis.min_interval_width_px = min_px;
        self.x_axis.max_interval_width_px = max_px;
        self
    }

    #[must_use]
    pub fn with_data_fit_padding(mut self, padding: DataFitPadding) -> Self {
        self.x_axis.data_fit_padding = padding;
        self
    }

    #[must_use]
    pub fn with_smooth_scrolling(mut self, enabled: bool) -> Self {
        self.x_axis.smooth_scrolling = enabled;
        self
    }

    #[must_use]
    pub fn with_kinetic_pan_config(mut self, config: KineticPanConfig) -> Self {
        self.x_axis.kinetic_pan = config;
        self
    }

    #[must_use]
    pub fn with_quote_bounds_animation_ms(mut self, duration_ms: f64) -> Self {
        self.quote_bounds_animation_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_current_tick_animation_ms(mut self, duration_ms: f64) -> Self {
        self.current_tick_animation_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_annotation_animation_ms(mut self, duration_ms: f64) -> Self {
        self.annotation_animation_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_blink_animation(mut self, enabled: bool) -> Self {
        self.show_blink_animation = enabled;
        self
    }

    #[must_use]
    pub fn with_blink_period_ms(mut self, period_ms: f64) -> Self {
        self.blink_period_ms = period_ms;
        self
    }

    #[must_use]
    pub fn with_crosshair_snap_policy(mut self, policy: CrosshairSnapPolicy) -> Self {
        self.crosshair_snap_policy = policy;
        self
    }

    #[must_use]
    pub fn with_vertical_padding(mut self, padding: VerticalPadding) -> Self {
        self.vertical_padding = padding;
        self
    }

    #[must_use]
    pub fn with_gesture_config(mut self, gestures: GestureConfig) -> Self {
        self.gestures = gestures;
        self
    }

    #[must_use]
    pub fn with_double_tap_enabled(mut self, enabled: bool) -> Self {
        self.double_tap_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_pip_size(mut self, pip_size: u32) -> Self {
        self.pip_size = pip_size;
        self
    }

    #[must_use]
    pub fn with_render_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    ///
    /// Missing optional fields take their defaults; the result is validated
    /// when the engine is built, not here.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}
