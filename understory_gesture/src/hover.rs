// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover: periodic samples while the pointer rests over the target.
//!
//! After the pointer enters, sampling starts once `delay` (150 ms) has passed
//! and then repeats every `interval` (30 ms). Each sample carries an
//! iteration counter and the time since the pointer entered. Sampling stops
//! when the pointer leaves or once `timeout` (10 s) has elapsed.

use understory_timing::{Millis, TimerToken};

use crate::config::GestureConfig;
use crate::event::{Detail, GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler, TimerTag};
use crate::tracker::PointTracker;

const DEFAULT_DELAY: Millis = 150;
const DEFAULT_INTERVAL: Millis = 30;
const DEFAULT_TIMEOUT: Millis = 10_000;

/// Hover recognizer.
#[derive(Clone, Debug)]
pub struct Hover {
    state: RecognizerState,
    delay: Millis,
    interval: Millis,
    timeout: Millis,
    start_timer: Option<TimerToken>,
    sample_timer: Option<TimerToken>,
    iterate: u32,
}

impl Hover {
    /// Creates a hover recognizer.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(1, 1);
        Self {
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), Listen::OVER),
            delay: config.delay.unwrap_or(DEFAULT_DELAY),
            interval: config.interval.unwrap_or(DEFAULT_INTERVAL).max(1),
            timeout: config.timeout.unwrap_or(DEFAULT_TIMEOUT),
            start_timer: None,
            sample_timer: None,
            iterate: 0,
        }
    }

    fn clear_tracking(&mut self, scheduler: &mut dyn Scheduler) {
        for token in [self.start_timer.take(), self.sample_timer.take()]
            .into_iter()
            .flatten()
        {
            scheduler.cancel(token);
        }
    }

    fn sample(&mut self, cx: &mut Cx<'_>) {
        let tracker = &self.state.tracker;
        let lapse = cx.now().saturating_sub(tracker.session_start());
        if lapse > self.timeout {
            self.clear_tracking(cx.scheduler());
            return;
        }
        let mut event = GestureEvent::new(GestureKind::Hover, Phase::Hover, cx.now())
            .with_fingers(tracker.active())
            .with_identifier(tracker.identifier())
            .with_detail(Detail::Hover {
                iterate: self.iterate,
                lapse,
            });
        if let Some(first) = tracker.first() {
            event = event.at(first.current);
        }
        self.iterate = self.iterate.saturating_add(1);
        cx.emit(event);
    }
}

impl Recognizer for Hover {
    fn kind(&self) -> GestureKind {
        GestureKind::Hover
    }

    fn state(&self) -> &RecognizerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecognizerState {
        &mut self.state
    }

    fn on_input(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        match input.edge {
            Edge::Over => {
                if self.state.tracker.start_session(input, cx.geometry()) {
                    self.state.listen(Listen::OUT);
                    self.clear_tracking(cx.scheduler());
                    self.iterate = 0;
                    self.start_timer = Some(cx.set_timeout(self.delay, TimerTag::HoverStart));
                }
            }
            Edge::Out => {
                if self.state.tracker.end_session(input, |_| {}) {
                    self.state.unlisten(Listen::OUT);
                    self.clear_tracking(cx.scheduler());
                }
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, tag: TimerTag, cx: &mut Cx<'_>) {
        match tag {
            TimerTag::HoverStart => {
                self.start_timer = None;
                self.sample_timer = Some(cx.set_interval(self.interval, TimerTag::HoverSample));
            }
            TimerTag::HoverSample => self.sample(cx),
            _ => {}
        }
    }

    fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.clear_tracking(scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use alloc::vec::Vec;

    #[test]
    fn samples_after_delay_until_out() {
        let mut h = Harness::new(GestureKind::Hover, GestureConfig::new());
        h.feed(RawInput::mouse(Edge::Over, 1000, (20.0, 20.0)));
        h.advance(1149);
        assert!(h.events.is_empty());
        h.feed(RawInput::mouse(Edge::Out, 1245, (20.0, 20.0)));

        let samples: Vec<(u32, Millis)> = h
            .events
            .iter()
            .filter_map(|e| match e.detail {
                Detail::Hover { iterate, lapse } => Some((iterate, lapse)),
                _ => None,
            })
            .collect();
        assert_eq!(samples, [(0, 180), (1, 210), (2, 240)]);
        assert!(h.timers.is_empty());
        assert!(!h.recognizer.accepts(Edge::Out));
    }

    #[test]
    fn stops_sampling_after_timeout() {
        let config = GestureConfig::new().delay(0).interval(10).timeout(50);
        let mut h = Harness::new(GestureKind::Hover, config);
        h.feed(RawInput::mouse(Edge::Over, 0, (20.0, 20.0)));
        h.advance(500);
        assert_eq!(h.events.len(), 5);
        assert!(h.timers.is_empty());
    }

    #[test]
    fn reentering_restarts_the_counter() {
        let mut h = Harness::new(GestureKind::Hover, GestureConfig::new());
        h.feed(RawInput::mouse(Edge::Over, 0, (20.0, 20.0)));
        h.advance(200);
        h.feed(RawInput::mouse(Edge::Out, 200, (20.0, 20.0)));
        h.events.clear();
        h.feed(RawInput::mouse(Edge::Over, 300, (20.0, 20.0)));
        h.advance(480);
        assert_eq!(h.events[0].detail, Detail::Hover { iterate: 0, lapse: 180 });
    }
}
