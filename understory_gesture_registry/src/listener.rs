// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listeners and what they receive.

use alloc::rc::Rc;
use core::fmt;

use understory_gesture::{GestureEvent, NativeEvent};

use crate::target::TargetId;

/// What a listener is called with.
#[derive(Clone, Copy, Debug)]
pub enum Delivery<'a> {
    /// A native event bound directly by name.
    Native {
        /// The element the binding was made on.
        target: TargetId,
        /// The host event.
        event: &'a NativeEvent,
    },
    /// A gesture event.
    Gesture {
        /// The element the binding was made on.
        target: TargetId,
        /// The gesture event.
        event: &'a GestureEvent,
        /// The host event that produced it; `None` for timer-driven events
        /// such as a longpress start or a hover sample.
        native: Option<&'a NativeEvent>,
    },
}

impl<'a> Delivery<'a> {
    /// The element the binding was made on.
    #[must_use]
    pub fn target(&self) -> TargetId {
        match *self {
            Self::Native { target, .. } | Self::Gesture { target, .. } => target,
        }
    }

    /// The gesture event, if this is a gesture delivery.
    #[must_use]
    pub fn gesture(&self) -> Option<&'a GestureEvent> {
        match *self {
            Self::Gesture { event, .. } => Some(event),
            Self::Native { .. } => None,
        }
    }

    /// The underlying host event, if any.
    #[must_use]
    pub fn native(&self) -> Option<&'a NativeEvent> {
        match *self {
            Self::Native { event, .. } => Some(event),
            Self::Gesture { native, .. } => native,
        }
    }
}

/// Identity of a listener; clones of one [`Listener`] share it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

/// A shared callback.
///
/// Registering the same `Listener` (or a clone of it) twice for the same
/// target and event is recognized as a duplicate.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Delivery<'_>)>);

impl Listener {
    /// Wraps a callback.
    pub fn new(f: impl Fn(&Delivery<'_>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// This listener's identity.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        ListenerId(Rc::as_ptr(&self.0).cast::<()>() as usize)
    }

    /// Invokes the callback.
    pub fn call(&self, delivery: &Delivery<'_>) {
        (self.0)(delivery);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.id()).finish()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Listener {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use kurbo::Point;
    use understory_gesture::{GestureKind, Phase};

    #[test]
    fn clones_share_identity() {
        let a = Listener::new(|_| {});
        let b = Listener::new(|_| {});
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn call_passes_delivery_through() {
        let seen = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&seen);
        let listener = Listener::new(move |d| {
            if d.gesture().is_some_and(|e| e.phase == Phase::Tap) {
                counter.set(counter.get() + 1);
            }
        });
        let tap = GestureEvent::new(GestureKind::Tap, Phase::Tap, 0).at(Point::new(1.0, 2.0));
        let delivery = Delivery::Gesture {
            target: TargetId(9),
            event: &tap,
            native: None,
        };
        listener.call(&delivery);
        assert_eq!(seen.get(), 1);
        assert_eq!(delivery.target(), TargetId(9));
        assert!(delivery.native().is_none());
    }
}
