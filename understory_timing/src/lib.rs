// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives.
//!
//! UI runtimes need a handful of small timers: a double-tap window, a
//! longpress delay, hover sampling, a wheel "silence" timeout, per-frame
//! polling. This crate models them as plain data so that the owner of the
//! event loop decides when time advances.
//!
//! - [`TimerQueue`] stores one-shot and repeating timers, each carrying a
//!   caller-defined payload and identified by a [`TimerToken`].
//! - [`TimerQueue::pop_due`] hands back one due timer at a time, so handlers
//!   may schedule or cancel other timers between firings.
//! - [`Clock`] abstracts the time source; [`ManualClock`] is the deterministic
//!   clock used in tests.
//!
//! Time is expressed in integer milliseconds ([`Millis`]) from an arbitrary
//! origin chosen by the host.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let once = timers.schedule_after(0, 100, "once");
//! let _tick = timers.schedule_repeating(0, 30, 30, "tick");
//!
//! // Nothing is due yet.
//! assert!(timers.pop_due(10).is_none());
//!
//! // At t=100 the repeating timer has fired 3 times (30, 60, 90) and the
//! // one-shot once; they come back in deadline order.
//! let mut fired = Vec::new();
//! while let Some(f) = timers.pop_due(100) {
//!     fired.push((f.deadline, f.payload));
//! }
//! assert_eq!(fired, vec![(30, "tick"), (60, "tick"), (90, "tick"), (100, "once")]);
//! assert!(!timers.is_pending(once));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod clock;
mod queue;

pub use clock::{Clock, ManualClock};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use queue::{Fired, TimerQueue, TimerToken};

/// Milliseconds since a host-chosen origin.
pub type Millis = u64;
