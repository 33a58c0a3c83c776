// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: multi-pointer gesture recognizers.
//!
//! This crate turns raw pointer input (mouse, touch, pointer events, hover
//! and wheel) into higher-level gestures. Each gesture is a small state
//! machine over the down → move* → up edges, fed by a [`tracker::PointTracker`]
//! that follows every contact of the current session.
//!
//! - [`bridge`]: normalize host events ([`bridge::NativeEvent`]) into
//!   [`input::RawInput`] and track the current input modality.
//! - [`keys`]: held modifier keys and key names.
//! - [`tracker`]: contact sessions, finger bounds and the cancel flag.
//! - [`geometry`] and [`position`]: target bounding boxes and the coordinate
//!   policy that turns page positions into the reported ones.
//! - [`recognizer`]: the [`recognizer::Recognizer`] trait, the [`recognizer::Cx`]
//!   context and [`recognizer::build`].
//! - One module per gesture: [`click`], [`double_tap`], [`drag`],
//!   [`transform`] (pinch/rotate), [`swipe`], [`tap`] (tap and longpress),
//!   [`hover`] and [`wheel`].
//!
//! Recognizers never touch a host directly. They read the target's geometry
//! through [`geometry::GeometrySource`], schedule timers through
//! [`recognizer::Scheduler`] and append [`event::GestureEvent`]s to a buffer.
//! Routing events to targets and calling listeners is the job of
//! `understory_gesture_registry`.
//!
//! ## Example
//!
//! A two-finger pinch, driven by hand:
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_gesture::config::GestureConfig;
//! use understory_gesture::contact::ContactId;
//! use understory_gesture::event::{GestureKind, Phase};
//! use understory_gesture::input::{Edge, RawInput};
//! use understory_gesture::recognizer::{self, Cx, TimerTag};
//! use understory_timing::TimerQueue;
//!
//! let target = Rect::new(0.0, 0.0, 400.0, 400.0);
//! let mut timers = TimerQueue::<TimerTag>::new();
//! let mut events = Vec::new();
//! let mut pinch = recognizer::build(GestureKind::Gesture, &GestureConfig::new());
//!
//! let two = |edge, time, a: (f64, f64), b: (f64, f64)| {
//!     RawInput::new(edge, time)
//!         .with_sample(ContactId(1), a)
//!         .with_sample(ContactId(2), b)
//! };
//! for input in [
//!     two(Edge::Down, 0, (150.0, 200.0), (250.0, 200.0)),
//!     two(Edge::Move, 16, (100.0, 200.0), (300.0, 200.0)),
//!     RawInput::new(Edge::Up, 32),
//! ] {
//!     if pinch.accepts(input.edge) {
//!         let mut cx = Cx::new(input.time, &mut timers, &target, &mut events);
//!         pinch.on_input(&input, &mut cx);
//!     }
//! }
//!
//! let phases: Vec<Phase> = events.iter().map(|e| e.phase).collect();
//! assert_eq!(phases, [Phase::Start, Phase::Change, Phase::End]);
//! assert_eq!(events[1].scale(), Some(2.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: float math for `no_std` targets through `kurbo/libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bridge;
pub mod click;
pub mod config;
pub mod contact;
pub mod double_tap;
pub mod drag;
pub mod error;
pub mod event;
pub mod geometry;
pub mod hover;
pub mod input;
pub mod keys;
pub mod position;
pub mod recognizer;
pub mod swipe;
pub mod tap;
pub mod tracker;
pub mod transform;
pub mod wheel;

#[cfg(test)]
mod testing;

pub use bridge::{
    COMPAT_MOUSE_WINDOW, InputModality, NativeEvent, NativeEventBridge, NativeType, Supports, Touch,
};
pub use config::GestureConfig;
pub use contact::{ContactId, ContactPoint, PointerSample};
pub use error::ParseError;
pub use event::{Detail, GestureEvent, GestureKind, Phase};
pub use geometry::{BoundingBox, BoundingBoxCache, GeometrySource};
pub use input::{Edge, RawInput};
pub use keys::{KeyEvent, KeyPlatform, KeyTracker, Modifiers};
pub use position::CoordinatePolicy;
pub use recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler, TimerTag};
pub use tracker::PointTracker;
