// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture_registry --heading-base-level=0

//! Understory Gesture Registry: bind gestures and native events to listeners.
//!
//! A [`DispatchRegistry`] keeps one binding per (element, event name,
//! listener, capture) tuple. Gesture names (`tap`, `drag`, `gesture`, …) get
//! their own recognizer from `understory_gesture`; any other name is a native
//! event and is delivered as is. Pointer names fan out over the input families
//! the host supports, so `mousedown` also binds `touchstart` unless the
//! binding is `strict`.
//!
//! The host owns the elements. It implements [`TargetHost`] to resolve
//! selectors and report geometry, calls [`DispatchRegistry::dispatch`] for
//! every event it sees and [`DispatchRegistry::advance`] when
//! [`DispatchRegistry::next_deadline`] is reached.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::Rect;
//! use understory_gesture::{BoundingBox, GestureConfig, NativeEvent, Phase};
//! use understory_gesture_registry::{DispatchRegistry, Listener, TargetHost, TargetId};
//!
//! struct Page;
//!
//! impl TargetHost for Page {
//!     fn query_selector_all(&self, selector: &str) -> Vec<TargetId> {
//!         if selector == "#button" { vec![TargetId(1)] } else { Vec::new() }
//!     }
//!
//!     fn bounding_box(&self, _: TargetId) -> BoundingBox {
//!         BoundingBox::new(Rect::new(0.0, 0.0, 80.0, 30.0))
//!     }
//! }
//!
//! let taps = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&taps);
//! let listener = Listener::new(move |d| {
//!     if d.gesture().is_some_and(|e| e.phase == Phase::Tap) {
//!         seen.set(seen.get() + 1);
//!     }
//! });
//!
//! let mut registry = DispatchRegistry::default();
//! let handle = registry
//!     .add(&Page, "#button", "tap", &listener, &GestureConfig::new())
//!     .unwrap();
//!
//! registry.dispatch(TargetId(1), &NativeEvent::new("mousedown", 0, (10.0, 10.0)), &Page);
//! registry.dispatch(TargetId(1), &NativeEvent::new("mouseup", 90, (10.0, 10.0)), &Page);
//! assert_eq!(taps.get(), 1);
//!
//! registry.detach(&handle);
//! registry.dispatch(TargetId(1), &NativeEvent::new("mousedown", 200, (10.0, 10.0)), &Page);
//! registry.dispatch(TargetId(1), &NativeEvent::new("mouseup", 260, (10.0, 10.0)), &Page);
//! assert_eq!(taps.get(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `understory_gesture/std` and enables
//!   `tracing/std`.
//! - `libm`: forwards to `understory_gesture/libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod listener;
pub mod names;
pub mod registry;
pub mod target;

pub use error::RegistryError;
pub use listener::{Delivery, Listener, ListenerId};
pub use names::{EventName, EventSpec, parse_event_names};
pub use registry::{BindingKey, DispatchRegistry, EntryId, Registration};
pub use target::{Target, TargetHost, TargetId};
