//! Horizontal viewport model.
//!
//! [`XAxisModel`] owns the zoom scale (`ms_per_px`), the right bound epoch and
//! the flags that decide the per-frame [`ViewingMode`]. All mutation happens
//! on the frame thread: gesture handlers, data updates and
//! [`XAxisModel::on_new_frame`] are called in that order within one frame.

mod frame_controller;
mod scale_controller;
mod update_controller;

pub use update_controller::{EntriesChange, XAxisUpdate};

use serde::{Deserialize, Serialize};

use crate::animation::AnimatedValue;
use crate::core::{GapManager, TimeScale};
use crate::interaction::{KineticPanConfig, KineticPanState};

/// Scale reference used when the feed reports granularity `0` (raw ticks).
pub const TICK_MODE_GRANULARITY_MS: i64 = 1_000;

/// Duration of the animated jump back to the latest entry.
pub const SCROLL_TO_LAST_TICK_MS: f64 = 600.0;

/// The latest entry must stay this far right of the left bound for the
/// chart to keep following it (capped at half the canvas width).
pub const FOLLOW_MIN_DISTANCE_FROM_LEFT_PX: f64 = 150.0;

/// Viewing modes in priority order; recomputed every frame, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewingMode {
    ConstantScrollSpeed,
    FitData,
    FollowCurrentTick,
    Stationary,
}

/// Insets kept free around the data while fitting it into view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataFitPadding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for DataFitPadding {
    fn default() -> Self {
        Self {
            left: 16.0,
            top: 16.0,
            right: 120.0,
            bottom: 16.0,
        }
    }
}

impl DataFitPadding {
    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }
}

fn default_true() -> bool {
    true
}

/// Horizontal viewport tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XAxisConfig {
    /// Largest gap between the latest entry and the right edge, in pixels.
    /// Also bounds panning past either end of the data.
    pub max_current_tick_offset_px: f64,
    /// Offset used on first load and on reset; defaults to the max offset.
    #[serde(default)]
    pub initial_current_tick_offset_px: Option<f64>,
    /// Width of one granularity bucket at the default zoom.
    pub default_interval_width_px: f64,
    /// Narrowest bucket width (max zoom-out).
    pub min_interval_width_px: f64,
    /// Widest bucket width (max zoom-in).
    pub max_interval_width_px: f64,
    #[serde(default)]
    pub data_fit_padding: DataFitPadding,
    /// Follow mode advances every frame when `true`; otherwise it jumps once
    /// per appended tick.
    #[serde(default = "default_true")]
    pub smooth_scrolling: bool,
    #[serde(default)]
    pub kinetic_pan: KineticPanConfig,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            max_current_tick_offset_px: 150.0,
            initial_current_tick_offset_px: None,
            default_interval_width_px: 20.0,
            min_interval_width_px: 1.0,
            max_interval_width_px: 80.0,
            data_fit_padding: DataFitPadding::default(),
            smooth_scrolling: true,
            kinetic_pan: KineticPanConfig::default(),
        }
    }
}

impl XAxisConfig {
    #[must_use]
    pub fn initial_offset_px(self) -> f64 {
        self.initial_current_tick_offset_px
            .unwrap_or(self.max_current_tick_offset_px)
            .clamp(0.0, self.max_current_tick_offset_px.max(0.0))
    }
}

/// Visible epoch window reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleArea {
    pub left_epoch: i64,
    pub right_epoch: i64,
}

/// In-flight animated scroll, expressed as pixels still to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    distance_px: AnimatedValue,
    applied_px: f64,
}

#[derive(Debug, Clone)]
pub struct XAxisModel {
    config: XAxisConfig,
    width_px: f64,
    granularity_ms: i64,
    ms_per_px: f64,
    prev_ms_per_px: f64,
    right_bound_epoch: i64,
    min_epoch: Option<i64>,
    max_epoch: Option<i64>,
    now_epoch: i64,
    last_frame_epoch: Option<i64>,
    entries: Vec<i64>,
    entries_loaded: bool,
    pending_offset_px: Option<f64>,
    gaps: GapManager,
    is_live: bool,
    data_fit_enabled: bool,
    pan_speed_px_per_ms: f64,
    scroll_blocked: bool,
    scroll_animation: Option<ScrollAnimation>,
    kinetic: KineticPanState,
    last_viewing_mode: ViewingMode,
}

impl XAxisModel {
    #[must_use]
    pub fn new(config: XAxisConfig, width_px: f64, now_epoch: i64) -> Self {
        let mut model = Self {
            config,
            width_px: sanitize_width(width_px),
            granularity_ms: 0,
            ms_per_px: 1.0,
            prev_ms_per_px: 1.0,
            right_bound_epoch: now_epoch,
            min_epoch: None,
            max_epoch: None,
            now_epoch,
            last_frame_epoch: None,
            entries: Vec::new(),
            entries_loaded: false,
            pending_offset_px: None,
            gaps: GapManager::default(),
            is_live: false,
            data_fit_enabled: false,
            pan_speed_px_per_ms: 0.0,
            scroll_blocked: false,
            scroll_animation: None,
            kinetic: KineticPanState::default(),
            last_viewing_mode: ViewingMode::Stationary,
        };
        model.ms_per_px = model.default_ms_per_px();
        model.prev_ms_per_px = model.ms_per_px;
        model
    }

    #[must_use]
    pub fn config(&self) -> XAxisConfig {
        self.config
    }

    #[must_use]
    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    pub fn set_width(&mut self, width_px: f64) {
        self.width_px = sanitize_width(width_px);
        self.clamp_right_bound();
    }

    #[must_use]
    pub fn granularity_ms(&self) -> i64 {
        self.granularity_ms
    }

    fn effective_granularity(&self) -> f64 {
        if self.granularity_ms > 0 {
            self.granularity_ms as f64
        } else {
            TICK_MODE_GRANULARITY_MS as f64
        }
    }

    #[must_use]
    pub fn ms_per_px(&self) -> f64 {
        self.ms_per_px
    }

    #[must_use]
    pub fn min_ms_per_px(&self) -> f64 {
        self.effective_granularity() / self.config.max_interval_width_px
    }

    #[must_use]
    pub fn max_ms_per_px(&self) -> f64 {
        self.effective_granularity() / self.config.min_interval_width_px
    }

    #[must_use]
    pub fn default_ms_per_px(&self) -> f64 {
        (self.effective_granularity() / self.config.default_interval_width_px)
            .clamp(self.min_ms_per_px(), self.max_ms_per_px())
    }

    /// Width of one granularity bucket at the current scale.
    #[must_use]
    pub fn interval_width_px(&self) -> f64 {
        self.effective_granularity() / self.ms_per_px
    }

    #[must_use]
    pub fn right_bound_epoch(&self) -> i64 {
        self.right_bound_epoch
    }

    #[must_use]
    pub fn left_bound_epoch(&self) -> i64 {
        self.time_scale().left_bound_epoch(&self.gaps)
    }

    #[must_use]
    pub fn visible_area(&self) -> VisibleArea {
        VisibleArea {
            left_epoch: self.left_bound_epoch(),
            right_epoch: self.right_bound_epoch,
        }
    }

    #[must_use]
    pub fn now_epoch(&self) -> i64 {
        self.now_epoch
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.is_live
    }

    #[must_use]
    pub fn gaps(&self) -> &GapManager {
        &self.gaps
    }

    #[must_use]
    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        TimeScale::new(self.ms_per_px, self.right_bound_epoch, self.width_px)
    }

    #[must_use]
    pub fn x_from_epoch(&self, epoch: i64) -> f64 {
        self.time_scale().x_from_epoch(epoch, &self.gaps)
    }

    #[must_use]
    pub fn epoch_from_x(&self, x: f64) -> i64 {
        self.time_scale().epoch_from_x(x, &self.gaps)
    }

    #[must_use]
    pub fn px_between(&self, start: i64, end: i64) -> f64 {
        self.time_scale().px_between(start, end, &self.gaps)
    }

    #[must_use]
    pub fn shift_epoch(&self, epoch: i64, px: f64) -> i64 {
        self.time_scale().shift_epoch(epoch, px, &self.gaps)
    }

    #[must_use]
    pub fn is_epoch_visible(&self, epoch: i64) -> bool {
        epoch >= self.left_bound_epoch() && epoch <= self.right_bound_epoch
    }

    #[must_use]
    pub fn pan_speed_px_per_ms(&self) -> f64 {
        self.pan_speed_px_per_ms
    }

    /// Sets a constant scroll speed; any non-zero speed takes priority over
    /// every other viewing mode.
    pub fn set_pan_speed(&mut self, px_per_ms: f64) {
        self.pan_speed_px_per_ms = if px_per_ms.is_finite() { px_per_ms } else { 0.0 };
    }

    #[must_use]
    pub fn is_scroll_blocked(&self) -> bool {
        self.scroll_blocked
    }

    /// Blocks user scroll and scale (constant-speed scroll still applies).
    pub fn set_scroll_blocked(&mut self, blocked: bool) {
        self.scroll_blocked = blocked;
    }

    #[must_use]
    pub fn is_data_fit_enabled(&self) -> bool {
        self.data_fit_enabled
    }

    pub fn enable_data_fit(&mut self) {
        self.data_fit_enabled = true;
        self.fit_available_data();
    }

    pub fn disable_data_fit(&mut self) {
        self.data_fit_enabled = false;
    }

    pub fn toggle_data_fit(&mut self) {
        if self.data_fit_enabled {
            self.disable_data_fit();
        } else {
            self.enable_data_fit();
        }
    }

    #[must_use]
    pub fn kinetic_pan_state(&self) -> KineticPanState {
        self.kinetic
    }

    #[must_use]
    pub fn is_scroll_animating(&self) -> bool {
        self.scroll_animation.is_some()
    }

    #[must_use]
    pub fn viewing_mode(&self) -> ViewingMode {
        if self.pan_speed_px_per_ms != 0.0 {
            ViewingMode::ConstantScrollSpeed
        } else if self.data_fit_enabled {
            ViewingMode::FitData
        } else if self.is_following_current_tick() {
            ViewingMode::FollowCurrentTick
        } else {
            ViewingMode::Stationary
        }
    }

    fn is_following_current_tick(&self) -> bool {
        self.is_live && self.right_bound_epoch > self.now_epoch && self.current_tick_far_from_left()
    }

    fn current_tick_far_from_left(&self) -> bool {
        let Some(&last) = self.entries.last() else {
            return true;
        };
        let min_distance = FOLLOW_MIN_DISTANCE_FROM_LEFT_PX.min(self.width_px / 2.0);
        last > self.shift_epoch(self.left_bound_epoch(), min_distance)
    }

    fn min_right_bound_epoch(&self) -> Option<i64> {
        self.min_epoch
            .map(|epoch| self.shift_epoch(epoch, self.config.max_current_tick_offset_px))
    }

    fn max_right_bound_epoch(&self) -> Option<i64> {
        let max_epoch = match (self.max_epoch, self.is_live) {
            (Some(max_epoch), true) => Some(max_epoch.max(self.now_epoch)),
            (max_epoch, _) => max_epoch,
        };
        max_epoch.map(|epoch| self.shift_epoch(epoch, self.config.max_current_tick_offset_px))
    }

    /// Keeps the right bound inside the data-derived limits; inverted limits
    /// (no data yet) leave it untouched.
    fn clamp_right_bound(&mut self) {
        if let (Some(min), Some(max)) = (self.min_right_bound_epoch(), self.max_right_bound_epoch())
        {
            if min <= max {
                self.right_bound_epoch = self.right_bound_epoch.clamp(min, max);
            }
        }
    }

    /// Moves the right bound by `px` regardless of scroll blocking.
    pub(crate) fn shift_right_bound(&mut self, px: f64) {
        if !px.is_finite() || px == 0.0 {
            self.clamp_right_bound();
            return;
        }
        self.right_bound_epoch = self.shift_epoch(self.right_bound_epoch, px);
        self.clamp_right_bound();
    }

    fn scroll_to(&mut self, right_bound_epoch: i64) {
        self.right_bound_epoch = right_bound_epoch;
        self.clamp_right_bound();
    }

    fn set_ms_per_px(&mut self, ms_per_px: f64) {
        if ms_per_px.is_finite() && ms_per_px > 0.0 {
            self.ms_per_px = ms_per_px.clamp(self.min_ms_per_px(), self.max_ms_per_px());
        }
    }
}

fn sanitize_width(width_px: f64) -> f64 {
    if width_px.is_finite() {
        width_px.max(0.0)
    } else {
        0.0
    }
}
