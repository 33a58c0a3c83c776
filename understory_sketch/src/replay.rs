// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed replay of a recording.
//!
//! A [`Replay`] walks the recorded samples in order, one per step, waiting
//! between steps for the sample's recorded lapse divided by `speed`, capped
//! at `max_time_lapse`. The host polls it from its timer loop and redraws
//! the stroke in progress on every frame.
//!
//! ```
//! use kurbo::Point;
//! use understory_sketch::path::PathEntry;
//! use understory_sketch::replay::{Replay, ReplayPoll};
//! use understory_sketch::style::Style;
//!
//! let path = [
//!     PathEntry::begin(Point::new(0.0, 0.0), Style::default()),
//!     PathEntry::new(Point::new(5.0, 0.0), 4000),
//! ];
//! let mut replay = Replay::new(0);
//! assert!(matches!(replay.poll(&path, 0), ReplayPoll::Frame(_)));
//! // The first sample has no lapse, so the second is due at once.
//! assert!(matches!(replay.poll(&path, 0), ReplayPoll::Frame(_)));
//! // 4000 ms at 200x is 20 ms.
//! assert_eq!(replay.poll(&path, 0), ReplayPoll::Pending(20));
//! assert_eq!(replay.poll(&path, 20), ReplayPoll::Done);
//! ```

use understory_timing::Millis;

use crate::path::PathEntry;

/// Default replay speed-up.
pub const DEFAULT_SPEED: Millis = 200;

/// Default cap on the wait between two steps, in milliseconds.
pub const DEFAULT_MAX_TIME_LAPSE: Millis = 500;

/// One replay step: draw `path[stroke_start..=index]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReplayFrame {
    /// The sample just reached.
    pub index: usize,
    /// First sample of the stroke in progress.
    pub stroke_start: usize,
    /// Whether `index` is the last sample of its stroke, so the stroke can be
    /// committed to the finished layer.
    pub completes_stroke: bool,
}

/// Result of [`Replay::poll`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplayPoll {
    /// Nothing to draw before the given time.
    Pending(Millis),
    /// Draw this frame.
    Frame(ReplayFrame),
    /// Every sample has been drawn.
    Done,
}

/// Replay cursor over a recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replay {
    next: usize,
    stroke_start: usize,
    due: Millis,
    speed: Millis,
    max_time_lapse: Millis,
}

impl Replay {
    /// Starts a replay whose first step is due at `now`.
    #[must_use]
    pub fn new(now: Millis) -> Self {
        Self {
            next: 0,
            stroke_start: 0,
            due: now,
            speed: DEFAULT_SPEED,
            max_time_lapse: DEFAULT_MAX_TIME_LAPSE,
        }
    }

    /// Sets the speed-up factor; zero is treated as one.
    #[must_use]
    pub fn with_speed(mut self, speed: Millis) -> Self {
        self.speed = speed.max(1);
        self
    }

    /// Sets the cap on the wait between steps.
    #[must_use]
    pub fn with_max_time_lapse(mut self, max: Millis) -> Self {
        self.max_time_lapse = max;
        self
    }

    /// When the next step is due.
    #[must_use]
    pub fn due(&self) -> Millis {
        self.due
    }

    /// Advances by at most one sample.
    pub fn poll(&mut self, path: &[PathEntry], now: Millis) -> ReplayPoll {
        if now < self.due {
            return ReplayPoll::Pending(self.due);
        }
        let Some(entry) = path.get(self.next) else {
            return ReplayPoll::Done;
        };
        let index = self.next;
        if entry.begin_path {
            self.stroke_start = index;
        }
        self.next += 1;
        self.due = now + self.max_time_lapse.min(entry.lapse / self.speed);
        ReplayPoll::Frame(ReplayFrame {
            index,
            stroke_start: self.stroke_start,
            completes_stroke: path.get(self.next).is_none_or(|e| e.begin_path),
        })
    }
}
