// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sketch --heading-base-level=0

//! Understory Sketch: a headless sketch recorder built on drag gestures.
//!
//! A [`Sketch`] consumes the `drag` events of a drawing surface and keeps
//! them as a flat list of [`PathEntry`] samples. Each stroke starts with a
//! sample that snapshots the current [`Style`]; every sample records the time
//! since the previous one so the drawing can be replayed at its original
//! pace.
//!
//! - [`sketch`]: recording, undo, tools, SVG export and JSON storage.
//! - [`path`]: stroke grouping, Catmull-Rom smoothing into cubic Béziers and
//!   SVG path data.
//! - [`replay`]: the timing of an animated redraw.
//! - [`style`]: stroke style and tools.
//!
//! Pixels are left to the host. Strokes come out as [`kurbo::BezPath`]s in
//! sketch units; multiply by [`Sketch::zoom`] to draw them.
//!
//! ## Example
//!
//! ```rust
//! use understory_gesture::{GestureEvent, GestureKind, Phase};
//! use understory_sketch::{Sketch, SketchConfig, Tool};
//!
//! let mut sketch = Sketch::new(SketchConfig { zoom: 2.0, ..SketchConfig::default() });
//! for (phase, time, x) in [(Phase::Down, 0, 0.0), (Phase::Move, 16, 20.0), (Phase::Up, 32, 40.0)] {
//!     let event = GestureEvent::new(GestureKind::Drag, phase, time).at((x, 10.0).into());
//!     sketch.record(&event);
//! }
//! assert_eq!(sketch.strokes().count(), 1);
//! assert_eq!(sketch.to_svg_path_data(Some(0)).split('C').count(), 2);
//!
//! sketch.set_tool(Tool::Eraser);
//! assert!(sketch.style().is_eraser());
//! assert!(sketch.undo());
//! assert!(sketch.path().is_empty());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`, `serde/std` and
//!   `serde_json/std`.
//! - `libm`: float math for `no_std` targets through `kurbo/libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod path;
pub mod replay;
pub mod sketch;
pub mod style;

pub use error::SketchError;
pub use path::{PathEntry, Strokes, catmull_rom};
pub use replay::{Replay, ReplayFrame, ReplayPoll};
pub use sketch::{Sketch, SketchConfig};
pub use style::{Composite, LineCap, LineJoin, Style, Tool};
