use tracing::{debug, trace};

use crate::extensions::ChartEvent;
use crate::interaction::{
    CrosshairSnapPolicy, CrosshairState, CrosshairUpdate, Gesture, GestureEvent, PointerEvent,
};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Feeds one raw pointer event through the engine's own recognizer.
    ///
    /// Hosts sharing a [`crate::interaction::GestureBus`] between charts
    /// forward recognized gestures to [`ChartEngine::handle_gesture`] instead.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.core.runtime.disposed {
            debug!(phase = ?event.phase, "pointer event dropped after dispose");
            return;
        }
        let double_tap_enabled = self.core.config.double_tap_enabled;
        let gestures = self.core.runtime.recognizer.handle(event, double_tap_enabled);
        for gesture in gestures {
            self.handle_gesture(gesture);
        }
    }

    /// Fires the recognizer timers (long press, delayed taps) due at `now_ms`.
    pub fn poll_gestures(&mut self, now_ms: i64) {
        if self.core.runtime.disposed {
            return;
        }
        let gestures = self.core.runtime.recognizer.poll(now_ms);
        for gesture in gestures {
            self.handle_gesture(gesture);
        }
    }

    /// Applies one recognized gesture to the viewport and the crosshair.
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        if self.core.runtime.disposed {
            debug!(kind = ?event.gesture.kind(), "gesture dropped after dispose");
            return;
        }
        trace!(kind = ?event.gesture.kind(), time_ms = event.time_ms, "gesture");

        let time_ms = event.time_ms;
        match event.gesture {
            Gesture::ScaleStart(details) => {
                if !self.core.crosshair.is_dragging() {
                    self.core.x_axis.on_scale_start(details);
                }
            }
            Gesture::ScaleUpdate(details) => self.core.x_axis.on_scale_update(details),
            Gesture::ScaleEnd(details) => self.core.x_axis.on_scale_end(details),
            Gesture::LongPressStart { position } => {
                let price_scale = self.current_price_scale();
                let core = &mut self.core;
                let update = match core.model.series.as_ref() {
                    Some(series) => core.crosshair.on_long_press_start(
                        position,
                        time_ms,
                        series,
                        &mut core.x_axis,
                        price_scale,
                    ),
                    None => CrosshairUpdate::default(),
                };
                self.emit_crosshair_update(update);
            }
            Gesture::LongPressMove { position, .. } => {
                let price_scale = self.current_price_scale();
                let core = &mut self.core;
                let update = match core.model.series.as_ref() {
                    Some(series) => core.crosshair.on_long_press_move(
                        position,
                        time_ms,
                        series,
                        &mut core.x_axis,
                        price_scale,
                    ),
                    None => CrosshairUpdate::default(),
                };
                self.emit_crosshair_update(update);
            }
            Gesture::LongPressEnd { .. } => {
                let update = self.core.crosshair.on_long_press_end(&mut self.core.x_axis);
                self.emit_crosshair_update(update);
            }
            Gesture::Hover { position } => {
                let price_scale = self.current_price_scale();
                let core = &mut self.core;
                let update = match core.model.series.as_ref() {
                    Some(series) => {
                        core.crosshair
                            .on_hover(position, time_ms, series, &core.x_axis, price_scale)
                    }
                    None => CrosshairUpdate::default(),
                };
                self.emit_crosshair_update(update);
            }
            Gesture::HoverExit { .. } => {
                let update = self.core.crosshair.on_hover_exit();
                self.emit_crosshair_update(update);
            }
            Gesture::Tap { position } => self.emit_event(ChartEvent::Tapped { position }),
            Gesture::DoubleTap { position } => {
                self.emit_event(ChartEvent::DoubleTapped { position });
            }
        }
    }

    /// Switches crosshair snapping; a visible crosshair re-snaps on the next frame.
    pub fn set_crosshair_snap_policy(&mut self, policy: CrosshairSnapPolicy) {
        if self.core.runtime.disposed {
            debug!("set_crosshair_snap_policy ignored after dispose");
            return;
        }
        self.core.config.crosshair_snap_policy = policy;
        self.core.crosshair.set_policy(policy);
    }

    #[must_use]
    pub fn crosshair_state(&self) -> Option<CrosshairState> {
        self.core.crosshair.state()
    }
}
