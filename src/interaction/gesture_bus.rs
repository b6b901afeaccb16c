use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use super::gesture::{GestureEvent, GestureKind, GestureRecognizer, PointerEvent};

/// Handle identifying one subscriber across every kind it listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

pub type GestureHandler = Box<dyn FnMut(&GestureEvent)>;

/// Typed gesture broadcaster shared by every chart on one surface.
///
/// Raw pointer events go through one [`GestureRecognizer`]; recognized
/// gestures are delivered to the subscribers of their [`GestureKind`] in
/// registration order.
pub struct GestureBus {
    recognizer: GestureRecognizer,
    subscribers: IndexMap<GestureKind, IndexMap<SubscriberId, GestureHandler>>,
    next_id: u64,
}

impl fmt::Debug for GestureBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureBus")
            .field("recognizer", &self.recognizer)
            .field(
                "subscribers",
                &self
                    .subscribers
                    .iter()
                    .map(|(kind, handlers)| (*kind, handlers.len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for GestureBus {
    fn default() -> Self {
        Self::new(GestureRecognizer::default())
    }
}

impl GestureBus {
    #[must_use]
    pub fn new(recognizer: GestureRecognizer) -> Self {
        Self {
            recognizer,
            subscribers: IndexMap::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// Reserves a fresh subscriber id.
    pub fn next_subscriber_id(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Registers `handler` for `kind`. Registering an id again replaces its
    /// handler in place, keeping its delivery position.
    pub fn subscribe(&mut self, id: SubscriberId, kind: GestureKind, handler: GestureHandler) {
        let handlers = self.subscribers.entry(kind).or_default();
        if handlers.insert(id, handler).is_none() {
            debug!(?kind, subscriber = id.0, "gesture subscriber registered");
        }
    }

    /// Removes `id` from every kind.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        for handlers in self.subscribers.values_mut() {
            handlers.shift_remove(&id);
        }
    }

    #[must_use]
    pub fn has_subscribers(&self, kind: GestureKind) -> bool {
        self.subscribers
            .get(&kind)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Delivers `event` to the subscribers of its kind.
    pub fn publish(&mut self, event: &GestureEvent) {
        if let Some(handlers) = self.subscribers.get_mut(&event.gesture.kind()) {
            for handler in handlers.values_mut() {
                handler(event);
            }
        }
    }

    /// Recognizes and publishes; returns the gestures delivered.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) -> Vec<GestureEvent> {
        let double_tap_enabled = self.has_subscribers(GestureKind::DoubleTap);
        let events = self.recognizer.handle(event, double_tap_enabled);
        for gesture in &events {
            self.publish(gesture);
        }
        events
    }

    /// Fires elapsed recognizer timers and publishes the result.
    pub fn poll(&mut self, now_ms: i64) -> Vec<GestureEvent> {
        let events = self.recognizer.poll(now_ms);
        for gesture in &events {
            self.publish(gesture);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{GestureBus, SubscriberId};
    use crate::interaction::{GestureKind, PointerEvent};

    #[test]
    fn re_registration_keeps_delivery_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = GestureBus::default();
        for name in ["a", "b"] {
            let log = Rc::clone(&log);
            let id = bus.next_subscriber_id();
            bus.subscribe(id, GestureKind::Tap, Box::new(move |_| log.borrow_mut().push(name)));
        }
        let log_replaced = Rc::clone(&log);
        bus.subscribe(
            SubscriberId(0),
            GestureKind::Tap,
            Box::new(move |_| log_replaced.borrow_mut().push("a2")),
        );

        let _ = bus.dispatch_pointer(PointerEvent::down(1.0, 1.0, 0));
        let _ = bus.dispatch_pointer(PointerEvent::up(1.0, 1.0, 10));
        assert_eq!(*log.borrow(), vec!["a2", "b"]);
    }

    #[test]
    fn unsubscribe_removes_every_kind() {
        let mut bus = GestureBus::default();
        let id = bus.next_subscriber_id();
        bus.subscribe(id, GestureKind::Tap, Box::new(|_| {}));
        bus.subscribe(id, GestureKind::DoubleTap, Box::new(|_| {}));
        assert!(bus.has_subscribers(GestureKind::DoubleTap));
        bus.unsubscribe(id);
        assert!(!bus.has_subscribers(GestureKind::Tap));
        assert!(!bus.has_subscribers(GestureKind::DoubleTap));
    }
}
