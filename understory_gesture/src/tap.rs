// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap and longpress.
//!
//! Both watch the contacts of a session for drift: a contact that leaves the
//! target or moves more than `driftDeviance` (10 px by default) from where it
//! started cancels the session.
//!
//! - Tap fires when the last contact lifts within `timeout` (250 ms by
//!   default) of the first down, the session was not cancelled, and the
//!   number of contacts is within bounds.
//! - Longpress fires `start` once `delay` (500 ms by default) has passed
//!   with no cancellation and no contact lifted, then `end` on release.

use understory_timing::{Millis, TimerToken};

use crate::config::GestureConfig;
use crate::event::{GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler, TimerTag};
use crate::tracker::PointTracker;

const DEFAULT_DELAY: Millis = 500;
const DEFAULT_DRIFT: f64 = 10.0;
const DEFAULT_TIMEOUT: Millis = 250;

/// Tap and longpress recognizer.
#[derive(Clone, Debug)]
pub struct Tap {
    kind: GestureKind,
    state: RecognizerState,
    delay: Millis,
    drift: f64,
    timeout: Millis,
    pressed_at: Millis,
    timer: Option<TimerToken>,
    started: bool,
}

impl Tap {
    /// Creates the recognizer for `kind`, which is either
    /// [`GestureKind::Tap`] or [`GestureKind::LongPress`].
    #[must_use]
    pub fn new(kind: GestureKind, config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(1, usize::MAX);
        Self {
            kind,
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), Listen::DOWN),
            delay: config.delay.unwrap_or(DEFAULT_DELAY),
            drift: config.drift_deviance.unwrap_or(DEFAULT_DRIFT),
            timeout: config.timeout.unwrap_or(DEFAULT_TIMEOUT),
            pressed_at: 0,
            timer: None,
            started: false,
        }
    }

    fn is_longpress(&self) -> bool {
        self.kind == GestureKind::LongPress
    }

    fn on_down(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if !self.state.tracker.start_session(input, cx.geometry()) {
            return;
        }
        self.pressed_at = input.time;
        self.started = false;
        self.state
            .listen(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
        if self.is_longpress() {
            cx.clear_timer(&mut self.timer);
            self.timer = Some(cx.set_timeout(self.delay, TimerTag::LongPress));
        }
        self.check_drift(input, cx);
    }

    fn check_drift(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        let tracker = &self.state.tracker;
        let bbox = tracker.bounding_box();
        let drifted = input.changed.iter().any(|sample| {
            tracker.point(sample.id).is_some_and(|point| {
                let inside = bbox.contains_local(bbox.to_local(sample.page));
                !inside || point.local(sample.page).distance(point.start) > self.drift
            })
        });
        if drifted {
            tracing::trace!(kind = %self.kind, "press drifted");
            self.state.unlisten(Listen::MOVE);
            self.state.tracker.set_cancelled(true);
            cx.clear_timer(&mut self.timer);
        }
    }

    fn on_up(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if !self.state.tracker.end_session(input, |_| {}) {
            return;
        }
        cx.clear_timer(&mut self.timer);
        self.state
            .unlisten(Listen::MOVE | Listen::UP | Listen::DOCUMENT);

        let tracker = &self.state.tracker;
        let fingers = tracker.gesture_fingers();
        if self.is_longpress() {
            if core::mem::take(&mut self.started) {
                let event = self.event(Phase::End, fingers, input.time);
                cx.emit(event);
            }
            return;
        }
        if tracker.is_cancelled() || input.time.saturating_sub(self.pressed_at) > self.timeout {
            return;
        }
        if tracker.in_bounds(fingers) {
            let event = self.event(Phase::Tap, fingers, input.time);
            cx.emit(event);
        }
    }

    fn event(&self, phase: Phase, fingers: usize, time: Millis) -> GestureEvent {
        let tracker = &self.state.tracker;
        let mut event = GestureEvent::new(self.kind, phase, time)
            .with_fingers(fingers)
            .with_identifier(tracker.identifier());
        if let Some(first) = tracker.first() {
            event = event.at(first.start);
        }
        event
    }
}

impl Recognizer for Tap {
    fn kind(&self) -> GestureKind {
        self.kind
    }

    fn state(&self) -> &RecognizerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecognizerState {
        &mut self.state
    }

    fn on_input(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        match input.edge {
            Edge::Down => self.on_down(input, cx),
            Edge::Move => self.check_drift(input, cx),
            Edge::Up => self.on_up(input, cx),
            _ => {}
        }
    }

    fn on_timer(&mut self, tag: TimerTag, cx: &mut Cx<'_>) {
        if tag != TimerTag::LongPress {
            return;
        }
        self.timer = None;
        let tracker = &self.state.tracker;
        if tracker.is_cancelled() || tracker.points().iter().any(|p| p.ended) {
            return;
        }
        let fingers = tracker.points().len();
        if tracker.in_bounds(fingers) {
            self.started = true;
            let event = self.event(Phase::Start, fingers, cx.now());
            cx.emit(event);
        }
    }

    fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(token) = self.timer.take() {
            scheduler.cancel(token);
        }
        self.started = false;
    }
}
