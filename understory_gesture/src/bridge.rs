// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native events and their normalization into [`RawInput`].
//!
//! Hosts deliver pointer input in several families: mouse, touch, pointer and
//! the legacy `MSPointer` events, plus over/out and wheel events. A
//! [`NativeEvent`] models one of those with the fields recognizers need.
//! [`NativeEventBridge`] turns it into the family-neutral [`RawInput`] and
//! keeps track of which family the user is currently using.
//!
//! ```
//! use understory_gesture::bridge::{InputModality, NativeEvent, NativeEventBridge, Touch};
//! use understory_gesture::contact::ContactId;
//! use understory_gesture::input::Edge;
//!
//! let mut bridge = NativeEventBridge::default().with_compat_mouse_suppression(true);
//! let start = NativeEvent::touch("touchstart", 0, [Touch::new(7, (10.0, 20.0))], []);
//! let input = bridge.normalize(&start).unwrap();
//! assert_eq!(input.edge, Edge::Down);
//! assert_eq!(input.changed[0].id, ContactId(7));
//! assert_eq!(bridge.modality(), InputModality::Touch);
//!
//! // The compatibility mousedown synthesized after the touch is dropped.
//! assert!(bridge.normalize(&NativeEvent::new("mousedown", 5, (10.0, 20.0))).is_none());
//! ```

use alloc::string::String;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use understory_timing::Millis;

use crate::contact::{ContactId, PointerSample};
use crate::input::{Edge, RawInput};
use crate::keys::{KeyEvent, KeyPlatform, KeyTracker, Modifiers};

/// Native event type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// `mousedown`
    MouseDown,
    /// `mousemove`
    MouseMove,
    /// `mouseup`
    MouseUp,
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
    /// `touchend`
    TouchEnd,
    /// `touchcancel`
    TouchCancel,
    /// `pointerdown`
    PointerDown,
    /// `pointermove`
    PointerMove,
    /// `pointerup`
    PointerUp,
    /// `MSPointerDown`
    MsPointerDown,
    /// `MSPointerMove`
    MsPointerMove,
    /// `MSPointerUp`
    MsPointerUp,
    /// `mousewheel`
    MouseWheel,
    /// `DOMMouseScroll`
    DomMouseScroll,
    /// `wheel`
    Wheel,
    /// Any other event, kept by name.
    Other(String),
}

const KNOWN: [NativeType; 18] = [
    NativeType::MouseDown,
    NativeType::MouseMove,
    NativeType::MouseUp,
    NativeType::MouseOver,
    NativeType::MouseOut,
    NativeType::TouchStart,
    NativeType::TouchMove,
    NativeType::TouchEnd,
    NativeType::TouchCancel,
    NativeType::PointerDown,
    NativeType::PointerMove,
    NativeType::PointerUp,
    NativeType::MsPointerDown,
    NativeType::MsPointerMove,
    NativeType::MsPointerUp,
    NativeType::MouseWheel,
    NativeType::DomMouseScroll,
    NativeType::Wheel,
];

impl NativeType {
    /// The host's name for this event type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::MouseUp => "mouseup",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::MsPointerDown => "MSPointerDown",
            Self::MsPointerMove => "MSPointerMove",
            Self::MsPointerUp => "MSPointerUp",
            Self::MouseWheel => "mousewheel",
            Self::DomMouseScroll => "DOMMouseScroll",
            Self::Wheel => "wheel",
            Self::Other(name) => name,
        }
    }

    /// The input family this type belongs to; `None` for wheel and unknown
    /// events.
    #[must_use]
    pub fn family(&self) -> Option<InputFamily> {
        match self {
            Self::MouseDown | Self::MouseMove | Self::MouseUp | Self::MouseOver | Self::MouseOut => {
                Some(InputFamily::Mouse)
            }
            Self::TouchStart | Self::TouchMove | Self::TouchEnd | Self::TouchCancel => {
                Some(InputFamily::Touch)
            }
            Self::PointerDown | Self::PointerMove | Self::PointerUp => Some(InputFamily::Pointer),
            Self::MsPointerDown | Self::MsPointerMove | Self::MsPointerUp => {
                Some(InputFamily::MsPointer)
            }
            Self::MouseWheel | Self::DomMouseScroll | Self::Wheel | Self::Other(_) => None,
        }
    }

    /// The recognizer edge this type drives, if any.
    #[must_use]
    pub fn edge(&self) -> Option<Edge> {
        Some(match self {
            Self::MouseDown | Self::TouchStart | Self::PointerDown | Self::MsPointerDown => {
                Edge::Down
            }
            Self::MouseMove | Self::TouchMove | Self::PointerMove | Self::MsPointerMove => {
                Edge::Move
            }
            Self::MouseUp
            | Self::TouchEnd
            | Self::TouchCancel
            | Self::PointerUp
            | Self::MsPointerUp => Edge::Up,
            Self::MouseOver => Edge::Over,
            Self::MouseOut => Edge::Out,
            Self::MouseWheel | Self::DomMouseScroll | Self::Wheel => Edge::Wheel,
            Self::Other(_) => return None,
        })
    }
}

impl From<&str> for NativeType {
    /// Matches known names case-insensitively; anything else is kept as
    /// [`NativeType::Other`].
    fn from(name: &str) -> Self {
        KNOWN
            .iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| Self::Other(name.into()))
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A family of pointer events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputFamily {
    /// `mouse*`
    Mouse,
    /// `touch*`
    Touch,
    /// `pointer*`
    Pointer,
    /// `MSPointer*`
    MsPointer,
}

impl InputFamily {
    /// Down, move and up types of this family.
    #[must_use]
    pub fn pointer_types(self) -> [NativeType; 3] {
        match self {
            Self::Mouse => [NativeType::MouseDown, NativeType::MouseMove, NativeType::MouseUp],
            Self::Touch => [NativeType::TouchStart, NativeType::TouchMove, NativeType::TouchEnd],
            Self::Pointer => [
                NativeType::PointerDown,
                NativeType::PointerMove,
                NativeType::PointerUp,
            ],
            Self::MsPointer => [
                NativeType::MsPointerDown,
                NativeType::MsPointerMove,
                NativeType::MsPointerUp,
            ],
        }
    }

    /// The support flag for this family.
    #[must_use]
    pub const fn flag(self) -> Supports {
        match self {
            Self::Mouse => Supports::MOUSE,
            Self::Touch => Supports::TOUCH,
            Self::Pointer => Supports::POINTER,
            Self::MsPointer => Supports::MS_POINTER,
        }
    }
}

bitflags::bitflags! {
    /// Input families the host delivers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Supports: u8 {
        /// Mouse events.
        const MOUSE      = 0b0001;
        /// Touch events.
        const TOUCH      = 0b0010;
        /// Pointer events.
        const POINTER    = 0b0100;
        /// Legacy `MSPointer` events.
        const MS_POINTER = 0b1000;
    }
}

impl Default for Supports {
    fn default() -> Self {
        Self::MOUSE | Self::TOUCH
    }
}

/// Order in which families are fanned out.
const FAN_OUT: [InputFamily; 4] = [
    InputFamily::MsPointer,
    InputFamily::Pointer,
    InputFamily::Touch,
    InputFamily::Mouse,
];

/// One entry of a touch list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// Host touch identifier.
    pub identifier: u64,
    /// Position in page coordinates.
    pub page: Point,
}

impl Touch {
    /// Creates a touch.
    #[must_use]
    pub fn new(identifier: u64, page: impl Into<Point>) -> Self {
        Self {
            identifier,
            page: page.into(),
        }
    }
}

/// A host event, reduced to what the recognizers read.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent {
    /// Event type.
    pub ty: NativeType,
    /// Host timestamp.
    pub time: Millis,
    /// Page coordinates of the pointer, for non-touch events.
    pub page: Point,
    /// Pointer id, for pointer events.
    pub pointer_id: Option<u64>,
    /// Touches that changed, for touch events.
    pub changed_touches: Option<SmallVec<[Touch; 4]>>,
    /// Touches still on the surface.
    pub touches: SmallVec<[Touch; 4]>,
    /// Legacy wheel step count (`DOMMouseScroll`); zero when absent.
    pub detail: f64,
    /// Wheel delta (`mousewheel`).
    pub wheel_delta: f64,
}

impl NativeEvent {
    /// Creates a mouse-style event at `page`.
    #[must_use]
    pub fn new(ty: impl Into<NativeType>, time: Millis, page: impl Into<Point>) -> Self {
        Self {
            ty: ty.into(),
            time,
            page: page.into(),
            pointer_id: None,
            changed_touches: None,
            touches: SmallVec::new(),
            detail: 0.0,
            wheel_delta: 0.0,
        }
    }

    /// Creates a touch event from its changed and current touch lists.
    #[must_use]
    pub fn touch(
        ty: impl Into<NativeType>,
        time: Millis,
        changed: impl IntoIterator<Item = Touch>,
        touches: impl IntoIterator<Item = Touch>,
    ) -> Self {
        let changed: SmallVec<[Touch; 4]> = changed.into_iter().collect();
        let page = changed.first().map_or(Point::ZERO, |t| t.page);
        Self {
            changed_touches: Some(changed),
            touches: touches.into_iter().collect(),
            ..Self::new(ty, time, page)
        }
    }

    /// Sets the pointer id.
    #[must_use]
    pub fn with_pointer_id(mut self, id: u64) -> Self {
        self.pointer_id = Some(id);
        self
    }

    /// Sets the wheel fields.
    #[must_use]
    pub fn with_wheel(mut self, detail: f64, wheel_delta: f64) -> Self {
        self.detail = detail;
        self.wheel_delta = wheel_delta;
        self
    }
}

/// The input family the user is currently using.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputModality {
    /// Mouse input.
    #[default]
    Mouse,
    /// Touch input.
    Touch,
    /// Pointer or `MSPointer` input.
    Pointer,
}

impl From<InputFamily> for InputModality {
    fn from(family: InputFamily) -> Self {
        match family {
            InputFamily::Mouse => Self::Mouse,
            InputFamily::Touch => Self::Touch,
            InputFamily::Pointer | InputFamily::MsPointer => Self::Pointer,
        }
    }
}

/// Normalizes native events and tracks the input modality.
#[derive(Clone, Debug, Default)]
pub struct NativeEventBridge {
    supports: Supports,
    modality: InputModality,
    suppress_compat_mouse: bool,
    touched_at: Option<Millis>,
    last_touch: Option<Point>,
    keys: KeyTracker,
}

/// How long after a touch event a `mousedown`/`mouseup` counts as a
/// synthesized compatibility event.
pub const COMPAT_MOUSE_WINDOW: Millis = 800;

impl NativeEventBridge {
    /// Creates a bridge for a host delivering `supports`.
    #[must_use]
    pub fn new(supports: Supports) -> Self {
        Self {
            supports,
            ..Self::default()
        }
    }

    /// Drops `mousedown`/`mouseup` that follow a touch.
    ///
    /// Some touch hosts follow every tap with synthesized mouse events; with
    /// this on they don't start a second gesture. Only events within
    /// [`COMPAT_MOUSE_WINDOW`] of the last touch event are dropped, so a real
    /// mouse press later on switches the modality back.
    #[must_use]
    pub fn with_compat_mouse_suppression(mut self, on: bool) -> Self {
        self.suppress_compat_mouse = on;
        self
    }

    /// Uses `platform`'s meta key mapping for [`track_key`](Self::track_key).
    #[must_use]
    pub fn with_key_platform(mut self, platform: KeyPlatform) -> Self {
        self.keys = KeyTracker::new(platform);
        self
    }

    /// Feeds a `keydown`/`keyup` to the modifier tracker.
    pub fn track_key(&mut self, event: &KeyEvent) {
        self.keys.track(event);
    }

    /// Modifiers held as of the last key event.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.keys.modifiers()
    }

    /// The modifier tracker.
    pub fn keys_mut(&mut self) -> &mut KeyTracker {
        &mut self.keys
    }

    /// Families the host delivers.
    #[must_use]
    pub fn supports(&self) -> Supports {
        self.supports
    }

    /// The family of the most recent down.
    #[must_use]
    pub fn modality(&self) -> InputModality {
        self.modality
    }

    /// Overrides the modality.
    pub fn set_modality(&mut self, modality: InputModality) {
        self.modality = modality;
    }

    /// Converts `event` to a recognizer input.
    ///
    /// Returns `None` for events that drive no edge, for families the host
    /// does not deliver, and for suppressed compatibility mouse events.
    pub fn normalize(&mut self, event: &NativeEvent) -> Option<RawInput> {
        let edge = event.ty.edge()?;
        let family = event.ty.family();
        if family.is_some_and(|f| !self.supports.contains(f.flag())) {
            tracing::trace!(ty = %event.ty, "unsupported input family");
            return None;
        }
        if self.suppress_compat_mouse
            && self.modality == InputModality::Touch
            && matches!(event.ty, NativeType::MouseDown | NativeType::MouseUp)
            && self
                .touched_at
                .is_some_and(|at| event.time.saturating_sub(at) < COMPAT_MOUSE_WINDOW)
        {
            tracing::trace!(ty = %event.ty, "compatibility mouse event dropped");
            return None;
        }
        if let (Edge::Down, Some(family)) = (edge, family) {
            self.modality = family.into();
        }
        if family == Some(InputFamily::Touch) {
            self.touched_at = Some(event.time);
        }

        let mut input = RawInput::new(edge, event.time);
        match &event.changed_touches {
            Some(changed) => {
                input.changed = changed
                    .iter()
                    .map(|t| PointerSample::new(ContactId(t.identifier), t.page))
                    .collect();
            }
            None => {
                let id = event.pointer_id.map_or(ContactId::MOUSE, ContactId);
                input.changed.push(PointerSample::new(id, event.page));
            }
        }
        input.touching = event
            .touches
            .iter()
            .map(|t| ContactId(t.identifier))
            .collect();
        if edge == Edge::Wheel {
            input.wheel_delta = if event.detail != 0.0 {
                event.detail * -20.0
            } else {
                event.wheel_delta
            };
        }
        if let Some(first) = input.changed.first() {
            self.last_touch = Some(first.page);
        }
        Some(input)
    }

    /// Page coordinates of the event's first contact.
    ///
    /// A touch event with an empty changed list yields the last position seen.
    pub fn primary_coord(&mut self, event: &NativeEvent) -> Point {
        match &event.changed_touches {
            Some(changed) => match changed.first() {
                Some(touch) => {
                    self.last_touch = Some(touch.page);
                    touch.page
                }
                None => self.last_touch.unwrap_or(event.page),
            },
            None => event.page,
        }
    }

    /// Native types to listen to for `name`.
    ///
    /// A down, move or up type expands to the matching type of every family
    /// the host delivers unless `strict` is set. Other names map to
    /// themselves.
    #[must_use]
    pub fn expand_event_names(&self, name: &str, strict: bool) -> SmallVec<[NativeType; 4]> {
        let ty = NativeType::from(name);
        let index = match ty.edge() {
            Some(Edge::Down) => 0,
            Some(Edge::Move) => 1,
            Some(Edge::Up) if ty != NativeType::TouchCancel => 2,
            _ => return smallvec::smallvec![ty],
        };
        if strict || ty.family().is_none() {
            return smallvec::smallvec![ty];
        }
        let expanded: SmallVec<[NativeType; 4]> = FAN_OUT
            .into_iter()
            .filter(|family| self.supports.contains(family.flag()))
            .filter_map(|family| family.pointer_types().into_iter().nth(index))
            .collect();
        if expanded.is_empty() {
            smallvec::smallvec![ty]
        } else {
            expanded
        }
    }
}
