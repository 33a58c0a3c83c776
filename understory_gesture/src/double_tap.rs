// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double tap and double click.
//!
//! The first down opens a window (`timeout`, 700 ms by default). A second
//! down inside the window arms the gesture, and its release inside the window
//! completes it. While the window is open, a contact that leaves the target
//! or strays more than `driftDeviance` (25 px by default) on either axis
//! from the first down cancels the attempt.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use understory_timing::{Millis, TimerToken};

use crate::config::GestureConfig;
use crate::event::{GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler, TimerTag};
use crate::tracker::PointTracker;

const DEFAULT_WINDOW: Millis = 700;
const DEFAULT_DRIFT: f64 = 25.0;

/// Double-tap recognizer, also used for `dblclick`.
#[derive(Clone, Debug)]
pub struct DoubleTap {
    kind: GestureKind,
    state: RecognizerState,
    window: Millis,
    drift: f64,
    /// Time of the first down while the window is open.
    opened_at: Option<Millis>,
    /// Time from the first to the second down.
    second_after: Option<Millis>,
    first_page: Option<Point>,
    second_page: Option<Point>,
    timer: Option<TimerToken>,
}

impl DoubleTap {
    /// Creates the recognizer for `kind`, which is either
    /// [`GestureKind::DoubleTap`] or [`GestureKind::DoubleClick`].
    #[must_use]
    pub fn new(kind: GestureKind, config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(1, 1);
        Self {
            kind,
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), Listen::DOWN),
            window: config.timeout.unwrap_or(DEFAULT_WINDOW),
            drift: config.drift_deviance.unwrap_or(DEFAULT_DRIFT),
            opened_at: None,
            second_after: None,
            first_page: None,
            second_page: None,
            timer: None,
        }
    }

    fn phase(&self) -> Phase {
        match self.kind {
            GestureKind::DoubleClick => Phase::DoubleClick,
            _ => Phase::DoubleTap,
        }
    }

    fn awaiting_second(&self) -> bool {
        self.opened_at.is_some() && self.second_after.is_none()
    }

    fn abandon(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(token) = self.timer.take() {
            scheduler.cancel(token);
        }
        self.opened_at = None;
        self.second_after = None;
    }

    fn on_down(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        let Some(sample) = input.primary() else {
            return;
        };
        if let (Some(opened), true) = (self.opened_at, self.awaiting_second()) {
            self.second_page = Some(sample.page);
            self.second_after = Some(input.time.saturating_sub(opened));
        } else {
            self.first_page = Some(sample.page);
            self.second_page = None;
            self.opened_at = Some(input.time);
            self.second_after = None;
            cx.clear_timer(&mut self.timer);
            self.timer = Some(cx.set_timeout(self.window, TimerTag::DoubleTapWindow));
        }
        if self.state.tracker.start_session(input, cx.geometry()) {
            self.state.listen(Listen::MOVE | Listen::UP);
            self.check_drift(sample.page, cx);
        }
    }

    fn on_move(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if self.opened_at.is_none() {
            return;
        }
        if let Some(sample) = input.primary() {
            self.check_drift(sample.page, cx);
        }
    }

    /// Cancels the attempt if `page` is outside the target or too far from
    /// the first down.
    fn check_drift(&mut self, page: Point, cx: &mut Cx<'_>) {
        if self.awaiting_second() || self.second_page.is_some() {
            self.second_page = Some(page);
        }
        let (Some(first), Some(current)) = (self.first_page, self.second_page) else {
            return;
        };
        let bbox = self.state.tracker.bounding_box();
        let within = bbox.contains_local(bbox.to_local(current))
            && (current.x - first.x).abs() <= self.drift
            && (current.y - first.y).abs() <= self.drift;
        if !within {
            tracing::trace!(kind = %self.kind, "double tap drifted");
            self.state.unlisten(Listen::MOVE);
            self.abandon(cx.scheduler());
        }
    }

    fn on_up(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if self.state.tracker.end_session(input, |_| {}) {
            self.state.unlisten(Listen::MOVE | Listen::UP);
        }
        let (Some(_), Some(elapsed)) = (self.opened_at, self.second_after) else {
            return;
        };
        if elapsed <= self.window {
            if let Some(first) = self.state.tracker.first() {
                let event = GestureEvent::new(self.kind, self.phase(), input.time)
                    .at(first.start)
                    .with_fingers(self.state.tracker.gesture_fingers())
                    .with_identifier(self.state.tracker.identifier());
                cx.emit(event);
            }
        }
        self.abandon(cx.scheduler());
    }
}

impl Recognizer for DoubleTap {
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
            Edge::Move => self.on_move(input, cx),
            Edge::Up => self.on_up(input, cx),
            _ => {}
        }
    }

    fn on_timer(&mut self, tag: TimerTag, _cx: &mut Cx<'_>) {
        if tag == TimerTag::DoubleTapWindow {
            self.timer = None;
            self.opened_at = None;
        }
    }

    fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.abandon(scheduler);
        self.first_page = None;
        self.second_page = None;
    }
}
