// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit-test driver: one recognizer, a timer queue and a fixed target.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Rect;
use understory_timing::{Millis, TimerQueue};

use crate::config::GestureConfig;
use crate::event::{GestureEvent, GestureKind, Phase};
use crate::geometry::BoundingBox;
use crate::input::RawInput;
use crate::recognizer::{self, Cx, Recognizer, TimerTag};

pub(crate) struct Harness {
    pub(crate) recognizer: Box<dyn Recognizer>,
    pub(crate) timers: TimerQueue<TimerTag>,
    pub(crate) geometry: BoundingBox,
    pub(crate) events: Vec<GestureEvent>,
}

impl Harness {
    pub(crate) fn new(kind: GestureKind, config: GestureConfig) -> Self {
        Self {
            recognizer: recognizer::build(kind, &config),
            timers: TimerQueue::new(),
            geometry: BoundingBox::new(Rect::new(0.0, 0.0, 400.0, 400.0)),
            events: Vec::new(),
        }
    }

    /// Fires timers due before the input, then delivers it if accepted.
    pub(crate) fn feed(&mut self, input: RawInput) {
        self.advance(input.time);
        if self.recognizer.accepts(input.edge) {
            let mut cx = Cx::new(input.time, &mut self.timers, &self.geometry, &mut self.events);
            self.recognizer.on_input(&input, &mut cx);
        }
    }

    pub(crate) fn advance(&mut self, now: Millis) {
        while let Some(fired) = self.timers.pop_due(now) {
            let mut cx = Cx::new(
                fired.deadline,
                &mut self.timers,
                &self.geometry,
                &mut self.events,
            );
            self.recognizer.on_timer(fired.payload, &mut cx);
        }
    }

    pub(crate) fn phases(&self) -> Vec<Phase> {
        self.events.iter().map(|e| e.phase).collect()
    }
}
