use tracing::debug;

use crate::animation::AnimatedValue;

use super::{SCROLL_TO_LAST_TICK_MS, ScrollAnimation, ViewingMode, XAxisModel};

impl XAxisModel {
    /// Advances the viewport to `now_epoch`.
    ///
    /// Runs, in order: the scroll-to-last-tick animation, kinetic pan, then
    /// the behavior of the current viewing mode for the elapsed time.
    pub fn on_new_frame(&mut self, now_epoch: i64) {
        let elapsed_ms = self
            .last_frame_epoch
            .map_or(0, |previous| (now_epoch - previous).max(0));
        self.last_frame_epoch = Some(now_epoch);
        self.now_epoch = now_epoch;

        let scroll_animating = self.step_scroll_animation();
        if let Some(px) = self
            .kinetic
            .step(self.config.kinetic_pan, elapsed_ms as f64 / 1_000.0)
        {
            self.shift_right_bound(px);
        }

        let mode = self.viewing_mode();
        if mode != self.last_viewing_mode {
            debug!(from = ?self.last_viewing_mode, to = ?mode, "viewing mode changed");
            self.last_viewing_mode = mode;
        }

        match mode {
            ViewingMode::ConstantScrollSpeed => {
                self.shift_right_bound(self.pan_speed_px_per_ms * elapsed_ms as f64);
            }
            ViewingMode::FitData => {
                self.fit_available_data();
                if self.ms_per_px >= self.max_ms_per_px() {
                    debug!("data fit reached max zoom-out, releasing");
                    self.disable_data_fit();
                }
            }
            ViewingMode::FollowCurrentTick => {
                if self.config.smooth_scrolling && !scroll_animating {
                    self.right_bound_epoch += elapsed_ms;
                    self.clamp_right_bound();
                }
            }
            ViewingMode::Stationary => {}
        }
    }

    /// Zooms and scrolls so every entry fits inside the data-fit padding.
    pub fn fit_available_data(&mut self) {
        let (Some(&first), Some(&last)) = (self.entries.first(), self.entries.last()) else {
            return;
        };
        if self.width_px <= 0.0 {
            return;
        }

        let padding = self.config.data_fit_padding;
        let duration_ms = self.gaps.remove_gaps(first, last) as f64;
        let target_width = (self.width_px - padding.horizontal()).max(1.0);
        self.set_ms_per_px(duration_ms / target_width);
        self.right_bound_epoch = self.shift_epoch(last, padding.right);
    }

    /// Brings the latest entry back into view.
    ///
    /// Keeps the entry's current distance from the right edge (clamped to
    /// `[0, max offset]`) when it is visible, unless `reset_offset` asks for
    /// the initial offset. Animated jumps on a live chart aim where follow
    /// mode will be when the animation ends.
    pub fn scroll_to_last_tick(&mut self, animate: bool, reset_offset: bool) {
        let Some(&last) = self.entries.last() else {
            return;
        };
        self.kinetic.stop();

        let offset_px = if reset_offset || !self.is_epoch_visible(last) {
            self.config.initial_offset_px()
        } else {
            (self.width_px - self.x_from_epoch(last))
                .clamp(0.0, self.config.max_current_tick_offset_px.max(0.0))
        };
        let mut target = self.shift_epoch(last, offset_px);

        if !animate {
            self.scroll_animation = None;
            self.scroll_to(target);
            return;
        }

        if self.is_live {
            target += SCROLL_TO_LAST_TICK_MS as i64;
        }
        let distance_px = self.px_between(self.right_bound_epoch, target);
        let mut distance = AnimatedValue::new(0.0);
        distance.restart(0.0, distance_px, SCROLL_TO_LAST_TICK_MS, self.now_epoch);
        self.scroll_animation = Some(ScrollAnimation {
            distance_px: distance,
            applied_px: 0.0,
        });
        debug!(distance_px, "scroll to last tick started");
    }

    /// Applies the part of the scroll animation reached at `now_epoch`.
    /// Returns whether an animation was running this frame.
    fn step_scroll_animation(&mut self) -> bool {
        let Some(mut animation) = self.scroll_animation else {
            return false;
        };
        let value = animation.distance_px.value(self.now_epoch);
        let delta = value - animation.applied_px;
        animation.applied_px = value;
        self.shift_right_bound(delta);

        self.scroll_animation = animation
            .distance_px
            .is_animating(self.now_epoch)
            .then_some(animation);
        true
    }
}
