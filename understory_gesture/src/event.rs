// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture kinds, lifecycle phases and the event payload delivered to listeners.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use understory_timing::Millis;

use crate::error::ParseError;

/// The gestures a recognizer can be built for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GestureKind {
    /// Single click.
    Click,
    /// Double click; the double-tap recognizer under the mouse name.
    DoubleClick,
    /// Double tap.
    DoubleTap,
    /// One or more contacts dragged.
    Drag,
    /// Pinch and rotate with two or more contacts.
    Gesture,
    /// Fast directional flick.
    Swipe,
    /// Short press.
    Tap,
    /// Long press.
    LongPress,
    /// Pointer resting over the target.
    Hover,
    /// Wheel scrolling.
    Wheel,
}

impl GestureKind {
    /// Every kind, in name order.
    pub const ALL: [Self; 10] = [
        Self::Click,
        Self::DoubleClick,
        Self::DoubleTap,
        Self::Drag,
        Self::Gesture,
        Self::Swipe,
        Self::Tap,
        Self::LongPress,
        Self::Hover,
        Self::Wheel,
    ];

    /// The registration name of this gesture.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::DoubleTap => "dbltap",
            Self::Drag => "drag",
            Self::Gesture => "gesture",
            Self::Swipe => "swipe",
            Self::Tap => "tap",
            Self::LongPress => "longpress",
            Self::Hover => "hover",
            Self::Wheel => "wheel",
        }
    }

    /// Looks a kind up by its registration name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GestureKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| ParseError::UnknownGesture(s.to_string()))
    }
}

/// Lifecycle label of a [`GestureEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// A drag contact went down.
    Down,
    /// A drag contact moved.
    Move,
    /// A drag contact lifted.
    Up,
    /// A continuous gesture began.
    Start,
    /// A continuous gesture changed.
    Change,
    /// A continuous gesture ended.
    End,
    /// A click completed.
    Click,
    /// A double click completed.
    DoubleClick,
    /// A double tap completed.
    DoubleTap,
    /// A tap completed.
    Tap,
    /// A swipe completed.
    Swipe,
    /// A hover sample.
    Hover,
}

impl Phase {
    /// The phase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Move => "move",
            Self::Up => "up",
            Self::Start => "start",
            Self::Change => "change",
            Self::End => "end",
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::DoubleTap => "dbltap",
            Self::Tap => "tap",
            Self::Swipe => "swipe",
            Self::Hover => "hover",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gesture-specific metrics.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Detail {
    /// No extra metrics.
    #[default]
    None,
    /// Drag sample.
    Drag {
        /// Logical start of this contact.
        start: Point,
    },
    /// Pinch/rotate reading.
    Transform {
        /// Mean distance ratio from the centroid.
        scale: f64,
        /// Mean accumulated rotation, in degrees.
        rotation: f64,
        /// Target-local positions of the active contacts.
        touches: SmallVec<[Point; 4]>,
    },
    /// Completed swipe.
    Swipe {
        /// Centroid of the start positions.
        start: Point,
        /// Snapped direction in degrees, in `[0, 360)`, 0 pointing right and
        /// 90 pointing down.
        angle: f64,
        /// Mean speed, in pixels per millisecond.
        velocity: f64,
    },
    /// Hover sample.
    Hover {
        /// Sample counter, starting at zero.
        iterate: u32,
        /// Milliseconds since the pointer entered.
        lapse: Millis,
    },
    /// Wheel step.
    Wheel {
        /// Sign-scaled delta of this step; zero on end.
        delta: f64,
        /// Sum of the deltas since the wheel started.
        total: f64,
    },
}

/// Payload delivered to gesture listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// The gesture that produced this event.
    pub kind: GestureKind,
    /// Lifecycle label.
    pub phase: Phase,
    /// Logical position; the centroid for multi-contact readings.
    pub position: Point,
    /// Contact count.
    pub fingers: usize,
    /// Comma-joined contact ids, or the single id for per-contact events.
    pub identifier: String,
    /// Host timestamp.
    pub time: Millis,
    /// Gesture-specific metrics.
    pub detail: Detail,
}

impl GestureEvent {
    /// Creates an event at the origin with no contacts.
    #[must_use]
    pub fn new(kind: GestureKind, phase: Phase, time: Millis) -> Self {
        Self {
            kind,
            phase,
            position: Point::ZERO,
            fingers: 0,
            identifier: String::new(),
            time,
            detail: Detail::None,
        }
    }

    /// Sets the position.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Sets the contact count.
    #[must_use]
    pub fn with_fingers(mut self, fingers: usize) -> Self {
        self.fingers = fingers;
        self
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Sets the metrics.
    #[must_use]
    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = detail;
        self
    }

    /// Pinch scale, for transform events.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self.detail {
            Detail::Transform { scale, .. } => Some(scale),
            _ => None,
        }
    }

    /// Rotation in degrees, for transform events.
    #[must_use]
    pub fn rotation(&self) -> Option<f64> {
        match self.detail {
            Detail::Transform { rotation, .. } => Some(rotation),
            _ => None,
        }
    }

    /// Snapped angle, for swipes.
    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        match self.detail {
            Detail::Swipe { angle, .. } => Some(angle),
            _ => None,
        }
    }

    /// Velocity, for swipes.
    #[must_use]
    pub fn velocity(&self) -> Option<f64> {
        match self.detail {
            Detail::Swipe { velocity, .. } => Some(velocity),
            _ => None,
        }
    }

    /// Start position, for drags and swipes.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        match self.detail {
            Detail::Drag { start } | Detail::Swipe { start, .. } => Some(start),
            _ => None,
        }
    }

    /// Wheel delta of this step.
    #[must_use]
    pub fn wheel_delta(&self) -> Option<f64> {
        match self.detail {
            Detail::Wheel { delta, .. } => Some(delta),
            _ => None,
        }
    }

    /// Movement since the start position, for drags and swipes.
    #[must_use]
    pub fn delta(&self) -> Option<Vec2> {
        self.start().map(|s| self.position - s)
    }
}
