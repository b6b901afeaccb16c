//! Single-stream gesture recognition.
//!
//! [`GestureRecognizer`] turns raw pointer events into taps, double taps,
//! long presses and a unified scale/pan gesture without running competing
//! detectors. Time is supplied by the caller: every [`PointerEvent`] carries
//! `time_ms`, and [`GestureRecognizer::poll`] fires timers that elapse while
//! no pointer event arrives.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::PixelPoint;

use super::velocity::VelocityTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
    /// Pointer moving with no button pressed (mouse).
    Hover,
    HoverExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub phase: PointerPhase,
    pub position: PixelPoint,
    pub time_ms: i64,
}

impl PointerEvent {
    #[must_use]
    pub fn new(pointer_id: u64, phase: PointerPhase, x: f64, y: f64, time_ms: i64) -> Self {
        Self {
            pointer_id,
            phase,
            position: PixelPoint::new(x, y),
            time_ms,
        }
    }

    #[must_use]
    pub fn down(x: f64, y: f64, time_ms: i64) -> Self {
        Self::new(0, PointerPhase::Down, x, y, time_ms)
    }

    #[must_use]
    pub fn moved(x: f64, y: f64, time_ms: i64) -> Self {
        Self::new(0, PointerPhase::Move, x, y, time_ms)
    }

    #[must_use]
    pub fn up(x: f64, y: f64, time_ms: i64) -> Self {
        Self::new(0, PointerPhase::Up, x, y, time_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleStartDetails {
    pub focal_point: PixelPoint,
    pub pointer_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleUpdateDetails {
    pub focal_point: PixelPoint,
    /// Focal point movement since the previous update.
    pub focal_point_delta: PixelPoint,
    /// Cumulative span ratio since the gesture started.
    pub scale: f64,
    pub pointer_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleEndDetails {
    pub velocity_x_px_per_sec: f64,
    /// Largest number of pointers seen during the gesture.
    pub pointer_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Tap { position: PixelPoint },
    DoubleTap { position: PixelPoint },
    LongPressStart { position: PixelPoint },
    LongPressMove { position: PixelPoint, delta: PixelPoint },
    LongPressEnd { position: PixelPoint },
    ScaleStart(ScaleStartDetails),
    ScaleUpdate(ScaleUpdateDetails),
    ScaleEnd(ScaleEndDetails),
    Hover { position: PixelPoint },
    HoverExit { position: PixelPoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    Tap,
    DoubleTap,
    LongPressStart,
    LongPressMove,
    LongPressEnd,
    ScaleStart,
    ScaleUpdate,
    ScaleEnd,
    Hover,
    HoverExit,
}

impl Gesture {
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Tap { .. } => GestureKind::Tap,
            Self::DoubleTap { .. } => GestureKind::DoubleTap,
            Self::LongPressStart { .. } => GestureKind::LongPressStart,
            Self::LongPressMove { .. } => GestureKind::LongPressMove,
            Self::LongPressEnd { .. } => GestureKind::LongPressEnd,
            Self::ScaleStart(_) => GestureKind::ScaleStart,
            Self::ScaleUpdate(_) => GestureKind::ScaleUpdate,
            Self::ScaleEnd(_) => GestureKind::ScaleEnd,
            Self::Hover { .. } => GestureKind::Hover,
            Self::HoverExit { .. } => GestureKind::HoverExit,
        }
    }
}

/// Recognized gesture stamped with the time it was recognized at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub time_ms: i64,
    pub gesture: Gesture,
}

fn default_tap_slop_px() -> f64 {
    5.0
}

fn default_hold_radius_px() -> f64 {
    5.0
}

fn default_long_press_ms() -> i64 {
    500
}

fn default_double_tap_timeout_ms() -> i64 {
    300
}

fn default_double_tap_slop_px() -> f64 {
    18.0
}

/// Recognition thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Max distance from the gesture anchor for a tap.
    #[serde(default = "default_tap_slop_px")]
    pub tap_slop_px: f64,
    /// Movement beyond this cancels the long-press timer and starts a pan.
    #[serde(default = "default_hold_radius_px")]
    pub hold_radius_px: f64,
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: i64,
    #[serde(default = "default_double_tap_timeout_ms")]
    pub double_tap_timeout_ms: i64,
    /// Max distance between the two taps of a double tap.
    #[serde(default = "default_double_tap_slop_px")]
    pub double_tap_slop_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop_px: default_tap_slop_px(),
            hold_radius_px: default_hold_radius_px(),
            long_press_ms: default_long_press_ms(),
            double_tap_timeout_ms: default_double_tap_timeout_ms(),
            double_tap_slop_px: default_double_tap_slop_px(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Pointer down, still a tap or long-press candidate.
    Pressed,
    LongPress { last_position: PixelPoint },
    Scaling(ScaleTrack),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScaleTrack {
    last_focal: PixelPoint,
    span_start: f64,
    scale_base: f64,
    last_scale: f64,
    max_pointers: usize,
}

/// Single tap waiting out the double-tap window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTap {
    position: PixelPoint,
    deadline_ms: i64,
}

type ActivePointers = SmallVec<[(u64, PixelPoint); 2]>;

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    pointers: ActivePointers,
    anchor: Option<PixelPoint>,
    phase: Phase,
    long_press_deadline_ms: Option<i64>,
    pending_taps: VecDeque<PendingTap>,
    velocity: VelocityTracker,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pointers: SmallVec::new(),
            anchor: None,
            phase: Phase::Idle,
            long_press_deadline_ms: None,
            pending_taps: VecDeque::new(),
            velocity: VelocityTracker::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Position where the current gesture started; kept for the whole
    /// gesture even as the focal point moves.
    #[must_use]
    pub fn anchor(&self) -> Option<PixelPoint> {
        self.anchor
    }

    #[must_use]
    pub fn pending_tap_count(&self) -> usize {
        self.pending_taps.len()
    }

    /// Feeds one pointer event.
    ///
    /// `double_tap_enabled` reports whether anybody listens for double taps;
    /// only then are single taps held back for the double-tap window.
    pub fn handle(&mut self, event: PointerEvent, double_tap_enabled: bool) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        self.fire_timers(event.time_ms, &mut out);

        match event.phase {
            PointerPhase::Down => self.on_down(event, &mut out),
            PointerPhase::Move => self.on_move(event, &mut out),
            PointerPhase::Up => self.on_up(event, double_tap_enabled, &mut out),
            PointerPhase::Cancel => self.on_cancel(event, &mut out),
            PointerPhase::Hover => {
                if self.pointers.is_empty() {
                    push(&mut out, event.time_ms, Gesture::Hover {
                        position: event.position,
                    });
                }
            }
            PointerPhase::HoverExit => {
                if self.pointers.is_empty() {
                    push(&mut out, event.time_ms, Gesture::HoverExit {
                        position: event.position,
                    });
                }
            }
        }
        out
    }

    /// Fires the long-press timer and confirms single taps whose double-tap
    /// window has elapsed by `now_ms`.
    pub fn poll(&mut self, now_ms: i64) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        self.fire_timers(now_ms, &mut out);
        out
    }

    fn fire_timers(&mut self, now_ms: i64, out: &mut Vec<GestureEvent>) {
        loop {
            let tap_deadline = self.pending_taps.front().map(|tap| tap.deadline_ms);
            let long_press_deadline = self.long_press_deadline_ms;
            match (tap_deadline, long_press_deadline) {
                (Some(tap), long_press) if tap <= now_ms && long_press.is_none_or(|lp| tap <= lp) => {
                    if let Some(pending) = self.pending_taps.pop_front() {
                        push(out, tap, Gesture::Tap {
                            position: pending.position,
                        });
                    }
                }
                (_, Some(long_press)) if long_press <= now_ms => {
                    self.long_press_deadline_ms = None;
                    self.start_long_press(long_press, out);
                }
                _ => break,
            }
        }
    }

    fn start_long_press(&mut self, time_ms: i64, out: &mut Vec<GestureEvent>) {
        if self.phase != Phase::Pressed {
            return;
        }
        let Some(&(_, position)) = self.pointers.first() else {
            return;
        };
        self.flush_pending_taps(time_ms, out);
        trace!(x = position.x, y = position.y, "long press recognized");
        self.phase = Phase::LongPress {
            last_position: position,
        };
        push(out, time_ms, Gesture::LongPressStart { position });
    }

    fn on_down(&mut self, event: PointerEvent, out: &mut Vec<GestureEvent>) {
        match self.pointers.iter_mut().find(|(id, _)| *id == event.pointer_id) {
            Some(pointer) => pointer.1 = event.position,
            None => self.pointers.push((event.pointer_id, event.position)),
        }

        if self.pointers.len() == 1 {
            self.anchor = Some(event.position);
            self.phase = Phase::Pressed;
            self.long_press_deadline_ms = Some(event.time_ms + self.config.long_press_ms);
            self.velocity.reset();
            self.velocity.add(event.time_ms, event.position);
            return;
        }

        // Extra pointer: never a tap or long press any more.
        self.long_press_deadline_ms = None;
        match self.phase {
            Phase::Pressed => {
                self.flush_pending_taps(event.time_ms, out);
                self.begin_scale(event.time_ms, out);
            }
            Phase::Scaling(track) => self.rebase_scale(track),
            Phase::Idle | Phase::LongPress { .. } => {}
        }
    }

    fn on_move(&mut self, event: PointerEvent, out: &mut Vec<GestureEvent>) {
        let Some(pointer) = self
            .pointers
            .iter_mut()
            .find(|(id, _)| *id == event.pointer_id)
        else {
            return;
        };
        pointer.1 = event.position;
        if self.pointers.len() == 1 {
            self.velocity.add(event.time_ms, event.position);
        }

        match self.phase {
            Phase::Pressed => {
                let anchor = self.anchor.unwrap_or(event.position);
                if anchor.distance_to(event.position) > self.config.hold_radius_px {
                    self.long_press_deadline_ms = None;
                    self.flush_pending_taps(event.time_ms, out);
                    self.begin_scale(event.time_ms, out);
                    self.update_scale(event.time_ms, out);
                }
            }
            Phase::LongPress { last_position } => {
                self.phase = Phase::LongPress {
                    last_position: event.position,
                };
                push(out, event.time_ms, Gesture::LongPressMove {
                    position: event.position,
                    delta: event.position.offset_from(last_position),
                });
            }
            Phase::Scaling(_) => self.update_scale(event.time_ms, out),
            Phase::Idle => {}
        }
    }

    fn on_up(&mut self, event: PointerEvent, double_tap_enabled: bool, out: &mut Vec<GestureEvent>) {
        let Some(index) = self
            .pointers
            .iter()
            .position(|(id, _)| *id == event.pointer_id)
        else {
            return;
        };
        self.pointers.remove(index);

        match self.phase {
            Phase::Pressed if self.pointers.is_empty() => {
                let within_slop = self
                    .anchor
                    .is_some_and(|anchor| anchor.distance_to(event.position) <= self.config.tap_slop_px);
                if within_slop {
                    self.recognize_tap(event, double_tap_enabled, out);
                }
            }
            Phase::LongPress { .. } if self.pointers.is_empty() => {
                push(out, event.time_ms, Gesture::LongPressEnd {
                    position: event.position,
                });
            }
            Phase::Scaling(track) if self.pointers.is_empty() => {
                let velocity = if track.max_pointers == 1 {
                    self.velocity.velocity().x
                } else {
                    0.0
                };
                push(out, event.time_ms, Gesture::ScaleEnd(ScaleEndDetails {
                    velocity_x_px_per_sec: velocity,
                    pointer_count: track.max_pointers,
                }));
            }
            Phase::Scaling(track) => self.rebase_scale(track),
            _ => {}
        }

        if self.pointers.is_empty() {
            self.reset();
        }
    }

    fn on_cancel(&mut self, event: PointerEvent, out: &mut Vec<GestureEvent>) {
        match self.phase {
            Phase::LongPress { last_position } => push(out, event.time_ms, Gesture::LongPressEnd {
                position: last_position,
            }),
            Phase::Scaling(track) => push(out, event.time_ms, Gesture::ScaleEnd(ScaleEndDetails {
                velocity_x_px_per_sec: 0.0,
                pointer_count: track.max_pointers,
            })),
            Phase::Idle | Phase::Pressed => {}
        }
        self.pointers.clear();
        self.reset();
    }

    fn recognize_tap(&mut self, event: PointerEvent, double_tap_enabled: bool, out: &mut Vec<GestureEvent>) {
        if !double_tap_enabled {
            self.flush_pending_taps(event.time_ms, out);
            push(out, event.time_ms, Gesture::Tap {
                position: event.position,
            });
            return;
        }

        let partner = self.pending_taps.iter().position(|tap| {
            tap.deadline_ms >= event.time_ms
                && tap.position.distance_to(event.position) <= self.config.double_tap_slop_px
        });
        match partner.and_then(|index| self.pending_taps.remove(index)) {
            Some(first) => {
                trace!(x = first.position.x, y = first.position.y, "double tap recognized");
                push(out, event.time_ms, Gesture::DoubleTap {
                    position: first.position,
                });
            }
            None => self.pending_taps.push_back(PendingTap {
                position: event.position,
                deadline_ms: event.time_ms + self.config.double_tap_timeout_ms,
            }),
        }
    }

    /// Confirms every pending single tap right away.
    fn flush_pending_taps(&mut self, time_ms: i64, out: &mut Vec<GestureEvent>) {
        while let Some(pending) = self.pending_taps.pop_front() {
            push(out, time_ms, Gesture::Tap {
                position: pending.position,
            });
        }
    }

    fn begin_scale(&mut self, time_ms: i64, out: &mut Vec<GestureEvent>) {
        let focal_point = self.anchor.unwrap_or_else(|| self.focal_point());
        let track = ScaleTrack {
            last_focal: focal_point,
            span_start: self.span(),
            scale_base: 1.0,
            last_scale: 1.0,
            max_pointers: self.pointers.len(),
        };
        self.phase = Phase::Scaling(track);
        push(out, time_ms, Gesture::ScaleStart(ScaleStartDetails {
            focal_point,
            pointer_count: self.pointers.len(),
        }));
        if self.pointers.len() > 1 {
            self.rebase_scale(track);
        }
    }

    /// Re-anchors focal point and span after the pointer count changed so
    /// the gesture continues without jumps.
    fn rebase_scale(&mut self, track: ScaleTrack) {
        self.phase = Phase::Scaling(ScaleTrack {
            last_focal: self.focal_point(),
            span_start: self.span(),
            scale_base: track.last_scale,
            last_scale: track.last_scale,
            max_pointers: track.max_pointers.max(self.pointers.len()),
        });
    }

    fn update_scale(&mut self, time_ms: i64, out: &mut Vec<GestureEvent>) {
        let Phase::Scaling(track) = self.phase else {
            return;
        };
        let focal_point = self.focal_point();
        let span = self.span();
        let scale = if self.pointers.len() > 1 && track.span_start > 0.0 {
            track.scale_base * span / track.span_start
        } else {
            track.last_scale
        };
        self.phase = Phase::Scaling(ScaleTrack {
            last_focal: focal_point,
            last_scale: scale,
            ..track
        });
        push(out, time_ms, Gesture::ScaleUpdate(ScaleUpdateDetails {
            focal_point,
            focal_point_delta: focal_point.offset_from(track.last_focal),
            scale,
            pointer_count: self.pointers.len(),
        }));
    }

    fn focal_point(&self) -> PixelPoint {
        let count = self.pointers.len().max(1) as f64;
        let (sum_x, sum_y) = self
            .pointers
            .iter()
            .fold((0.0, 0.0), |(x, y), (_, point)| (x + point.x, y + point.y));
        PixelPoint::new(sum_x / count, sum_y / count)
    }

    /// Mean distance of the pointers from their focal point.
    fn span(&self) -> f64 {
        if self.pointers.len() < 2 {
            return 0.0;
        }
        let focal = self.focal_point();
        self.pointers
            .iter()
            .map(|(_, point)| point.distance_to(focal))
            .sum::<f64>()
            / self.pointers.len() as f64
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.phase = Phase::Idle;
        self.long_press_deadline_ms = None;
    }
}

fn push(out: &mut Vec<GestureEvent>, time_ms: i64, gesture: Gesture) {
    out.push(GestureEvent { time_ms, gesture });
}

#[cfg(test)]
mod tests {
    use super::{Gesture, GestureKind, GestureRecognizer, PointerEvent, PointerPhase};

    fn kinds(events: &[super::GestureEvent]) -> Vec<GestureKind> {
        events.iter().map(|event| event.gesture.kind()).collect()
    }

    #[test]
    fn tap_fires_immediately_without_double_tap_listener() {
        let mut recognizer = GestureRecognizer::default();
        assert!(recognizer.handle(PointerEvent::down(10.0, 10.0, 0), false).is_empty());
        let events = recognizer.handle(PointerEvent::up(12.0, 11.0, 80), false);
        assert_eq!(kinds(&events), vec![GestureKind::Tap]);
    }

    #[test]
    fn long_press_fires_from_poll_and_tracks_drag_until_release() {
        let mut recognizer = GestureRecognizer::default();
        let _ = recognizer.handle(PointerEvent::down(50.0, 50.0, 0), true);
        assert!(recognizer.poll(499).is_empty());
        let started = recognizer.poll(500);
        assert_eq!(kinds(&started), vec![GestureKind::LongPressStart]);

        let moved = recognizer.handle(PointerEvent::moved(300.0, 80.0, 600), true);
        assert_eq!(kinds(&moved), vec![GestureKind::LongPressMove]);
        let ended = recognizer.handle(PointerEvent::up(310.0, 80.0, 700), true);
        assert_eq!(
            ended[0].gesture,
            Gesture::LongPressEnd {
                position: crate::core::PixelPoint::new(310.0, 80.0)
            }
        );
    }

    #[test]
    fn movement_beyond_hold_radius_becomes_a_pan() {
        let mut recognizer = GestureRecognizer::default();
        let _ = recognizer.handle(PointerEvent::down(50.0, 50.0, 0), true);
        let events = recognizer.handle(PointerEvent::moved(70.0, 50.0, 20), true);
        assert_eq!(kinds(&events), vec![GestureKind::ScaleStart, GestureKind::ScaleUpdate]);
        assert!(recognizer.poll(1_000).is_empty());
        assert_eq!(recognizer.anchor().map(|anchor| anchor.x), Some(50.0));
    }

    #[test]
    fn second_pointer_starts_scale_and_cancels_long_press() {
        let mut recognizer = GestureRecognizer::default();
        let _ = recognizer.handle(PointerEvent::down(100.0, 100.0, 0), true);
        let events = recognizer.handle(
            PointerEvent::new(1, PointerPhase::Down, 200.0, 100.0, 50),
            true,
        );
        assert_eq!(kinds(&events), vec![GestureKind::ScaleStart]);

        let events = recognizer.handle(
            PointerEvent::new(1, PointerPhase::Move, 300.0, 100.0, 80),
            true,
        );
        let Gesture::ScaleUpdate(update) = events[0].gesture else {
            panic!("expected scale update");
        };
        assert!((update.scale - 2.0).abs() <= 1e-9);
        assert_eq!(update.pointer_count, 2);
        assert!(recognizer.poll(2_000).is_empty());
    }
}
