// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel: a run of wheel steps reported as one gesture.
//!
//! The first step of a run emits `start`, every later one `change`, each with
//! the step's delta and the running total. A run ends after `timeout`
//! (150 ms by default) without a step, emitting `end` with a zero delta.
//!
//! Deltas arrive already sign-scaled by the
//! [bridge](crate::bridge::NativeEventBridge): positive scrolls content up.

use kurbo::Point;
use understory_timing::{Millis, TimerToken};

use crate::config::GestureConfig;
use crate::event::{Detail, GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler, TimerTag};
use crate::tracker::PointTracker;

const DEFAULT_TIMEOUT: Millis = 150;

/// Wheel recognizer.
#[derive(Clone, Debug)]
pub struct Wheel {
    state: RecognizerState,
    timeout: Millis,
    steps: u32,
    total: f64,
    last: Point,
    timer: Option<TimerToken>,
}

impl Wheel {
    /// Creates a wheel recognizer.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            state: RecognizerState::new(
                PointTracker::new(1, 1, config.policy()),
                Listen::WHEEL,
            ),
            timeout: config.timeout.unwrap_or(DEFAULT_TIMEOUT),
            steps: 0,
            total: 0.0,
            last: Point::ZERO,
            timer: None,
        }
    }

    fn event(&self, phase: Phase, time: Millis, delta: f64) -> GestureEvent {
        GestureEvent::new(GestureKind::Wheel, phase, time)
            .at(self.last)
            .with_fingers(1)
            .with_detail(Detail::Wheel {
                delta,
                total: self.total,
            })
    }
}

impl Recognizer for Wheel {
    fn kind(&self) -> GestureKind {
        GestureKind::Wheel
    }

    fn state(&self) -> &RecognizerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecognizerState {
        &mut self.state
    }

    fn on_input(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if input.edge != Edge::Wheel {
            return;
        }
        if let Some(sample) = input.primary() {
            let bbox = cx.geometry().bounding_box();
            let offset = self.state.tracker.policy().offset(sample.page, &bbox);
            self.last = sample.page - offset;
        }
        let phase = if self.steps == 0 {
            Phase::Start
        } else {
            Phase::Change
        };
        self.steps = self.steps.saturating_add(1);
        self.total += input.wheel_delta;
        let event = self.event(phase, input.time, input.wheel_delta);
        cx.emit(event);

        cx.clear_timer(&mut self.timer);
        self.timer = Some(cx.set_timeout(self.timeout, TimerTag::WheelSilence));
    }

    fn on_timer(&mut self, tag: TimerTag, cx: &mut Cx<'_>) {
        if tag != TimerTag::WheelSilence {
            return;
        }
        self.timer = None;
        let event = self.event(Phase::End, cx.now(), 0.0);
        cx.emit(event);
        self.steps = 0;
        self.total = 0.0;
    }

    fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(token) = self.timer.take() {
            scheduler.cancel(token);
        }
        self.steps = 0;
        self.total = 0.0;
    }
}

/// Returns `true` when a wheel step would scroll a container past its edge.
///
/// Hosts with elastic overscroll bounce the whole page once a scrolling
/// container hits its top or bottom. Swallowing the step in that case keeps
/// the page still. `delta` follows the wheel recognizer's sign: positive
/// scrolls toward the top.
#[must_use]
pub fn blocks_elastic_bounce(
    scroll_top: f64,
    offset_height: f64,
    scroll_height: f64,
    delta: f64,
) -> bool {
    let at_bottom = scroll_top + offset_height == scroll_height;
    let at_top = scroll_top == 0.0;
    (at_bottom && delta <= 0.0) || (at_top && delta >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use alloc::vec::Vec;

    fn step(time: Millis, delta: f64) -> RawInput {
        RawInput::mouse(Edge::Wheel, time, (30.0, 40.0)).with_wheel_delta(delta)
    }

    #[test]
    fn run_of_steps_ends_after_silence() {
        let mut h = Harness::new(GestureKind::Wheel, GestureConfig::new());
        h.feed(step(0, -20.0));
        h.feed(step(50, -20.0));
        h.feed(step(120, 40.0));
        h.advance(269);
        assert_eq!(h.phases(), [Phase::Start, Phase::Change, Phase::Change]);
        h.advance(270);
        assert_eq!(
            h.phases(),
            [Phase::Start, Phase::Change, Phase::Change, Phase::End]
        );

        let details: Vec<Detail> = h.events.iter().map(|e| e.detail.clone()).collect();
        assert_eq!(
            details[2],
            Detail::Wheel {
                delta: 40.0,
                total: 0.0
            }
        );
        assert_eq!(
            details[3],
            Detail::Wheel {
                delta: 0.0,
                total: 0.0
            }
        );
        assert_eq!(h.events[3].time, 270);
        assert_eq!(h.events[0].position, Point::new(30.0, 40.0));
    }

    #[test]
    fn next_run_starts_fresh() {
        let mut h = Harness::new(GestureKind::Wheel, GestureConfig::new());
        h.feed(step(0, 60.0));
        h.feed(step(1000, 20.0));
        assert_eq!(h.phases(), [Phase::Start, Phase::End, Phase::Start]);
        assert_eq!(h.events[2].detail, Detail::Wheel { delta: 20.0, total: 20.0 });
    }

    #[test]
    fn elastic_bounce_guard() {
        // Scrolled to the bottom, scrolling further down.
        assert!(blocks_elastic_bounce(300.0, 100.0, 400.0, -20.0));
        // At the top, scrolling further up.
        assert!(blocks_elastic_bounce(0.0, 100.0, 400.0, 20.0));
        // In the middle, either way.
        assert!(!blocks_elastic_bounce(150.0, 100.0, 400.0, 20.0));
        assert!(!blocks_elastic_bounce(150.0, 100.0, 400.0, -20.0));
        // At the bottom, scrolling back up.
        assert!(!blocks_elastic_bounce(300.0, 100.0, 400.0, 20.0));
    }
}
