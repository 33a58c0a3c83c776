// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized input consumed by recognizers.
//!
//! A [`RawInput`] is one native event reduced to the three-edge pointer
//! machine (plus hover and wheel edges): which edge it is, which contacts
//! changed, and which contacts are still touching the surface.
//! [`NativeEventBridge`](crate::bridge::NativeEventBridge) produces these from
//! host events; tests usually build them directly.
//!
//! ```
//! use understory_gesture::contact::ContactId;
//! use understory_gesture::input::{Edge, RawInput};
//!
//! // Two fingers land, then the first one lifts while the second stays down.
//! let down = RawInput::new(Edge::Down, 0)
//!     .with_sample(ContactId(1), (10.0, 10.0))
//!     .with_sample(ContactId(2), (50.0, 10.0));
//! let up = RawInput::new(Edge::Up, 40)
//!     .with_sample(ContactId(1), (10.0, 10.0))
//!     .with_touching([ContactId(2)]);
//! assert_eq!(down.changed.len(), 2);
//! assert!(up.is_touching(ContactId(2)));
//! ```

use kurbo::Point;
use smallvec::SmallVec;
use understory_timing::Millis;

use crate::contact::{ContactId, PointerSample};

/// The edge of the pointer state machine an input belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// A contact began.
    Down,
    /// A contact moved.
    Move,
    /// A contact ended.
    Up,
    /// The pointer entered the target.
    Over,
    /// The pointer left the target.
    Out,
    /// A wheel step.
    Wheel,
}

/// One normalized input sample.
#[derive(Clone, Debug, PartialEq)]
pub struct RawInput {
    /// Which edge this input drives.
    pub edge: Edge,
    /// Host timestamp.
    pub time: Millis,
    /// Contacts that changed in this event.
    pub changed: SmallVec<[PointerSample; 4]>,
    /// Contacts still on the surface after this event.
    pub touching: SmallVec<[ContactId; 4]>,
    /// Sign-scaled wheel delta, for [`Edge::Wheel`].
    pub wheel_delta: f64,
}

impl RawInput {
    /// Creates an input with no contacts.
    #[must_use]
    pub fn new(edge: Edge, time: Millis) -> Self {
        Self {
            edge,
            time,
            changed: SmallVec::new(),
            touching: SmallVec::new(),
            wheel_delta: 0.0,
        }
    }

    /// Creates a single-contact mouse input.
    #[must_use]
    pub fn mouse(edge: Edge, time: Millis, page: impl Into<Point>) -> Self {
        Self::new(edge, time).with_sample(ContactId::MOUSE, page)
    }

    /// Adds a changed contact.
    #[must_use]
    pub fn with_sample(mut self, id: ContactId, page: impl Into<Point>) -> Self {
        self.changed.push(PointerSample::new(id, page.into()));
        self
    }

    /// Sets the contacts still on the surface.
    #[must_use]
    pub fn with_touching(mut self, ids: impl IntoIterator<Item = ContactId>) -> Self {
        self.touching = ids.into_iter().collect();
        self
    }

    /// Sets the wheel delta.
    #[must_use]
    pub fn with_wheel_delta(mut self, delta: f64) -> Self {
        self.wheel_delta = delta;
        self
    }

    /// The first changed contact.
    #[must_use]
    pub fn primary(&self) -> Option<&PointerSample> {
        self.changed.first()
    }

    /// Returns `true` if `id` is still on the surface.
    #[must_use]
    pub fn is_touching(&self, id: ContactId) -> bool {
        self.touching.contains(&id)
    }
}
