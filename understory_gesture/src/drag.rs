// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag: per-contact down, move and up events.
//!
//! Unlike the other recognizers, drag reports each contact separately: every
//! changed contact in a native event produces one [`GestureEvent`] whose
//! identifier is that contact's id and whose position is that contact's
//! logical position. Once a session starts, moves and ups are taken from the
//! whole document so a contact dragged off the target keeps reporting.
//!
//! ## Options
//!
//! - `monitor`: report moves over the target even with nothing pressed.
//! - `animationFrame`: coalesce moves into frames (every `frameInterval`
//!   milliseconds, 16 by default). A frame reports the latest move of each
//!   contact, and is skipped for contacts that have not moved since the last
//!   report. Downs and ups are never coalesced.
//! - `position`: with [`CoordinatePolicy::DifferenceFromLast`] each event
//!   carries the movement since the previous event.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_gesture::config::GestureConfig;
//! use understory_gesture::drag::Drag;
//! use understory_gesture::event::Phase;
//! use understory_gesture::input::{Edge, RawInput};
//! use understory_gesture::position::CoordinatePolicy;
//! use understory_gesture::recognizer::{Cx, Recognizer, TimerTag};
//! use understory_timing::TimerQueue;
//!
//! let target = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let mut timers = TimerQueue::<TimerTag>::new();
//! let mut events = Vec::new();
//! let mut drag = Drag::new(&GestureConfig::new().position(CoordinatePolicy::DifferenceFromLast));
//!
//! for input in [
//!     RawInput::mouse(Edge::Down, 0, (10.0, 10.0)),
//!     RawInput::mouse(Edge::Move, 16, (15.0, 12.0)),
//!     RawInput::mouse(Edge::Move, 32, (18.0, 12.0)),
//! ] {
//!     let mut cx = Cx::new(input.time, &mut timers, &target, &mut events);
//!     drag.on_input(&input, &mut cx);
//! }
//! let moves: Vec<Point> = events
//!     .iter()
//!     .filter(|e| e.phase == Phase::Move)
//!     .map(|e| e.position)
//!     .collect();
//! assert_eq!(moves, [Point::new(5.0, 2.0), Point::new(3.0, 0.0)]);
//! ```
//!
//! [`CoordinatePolicy::DifferenceFromLast`]: crate::position::CoordinatePolicy::DifferenceFromLast

use alloc::string::{String, ToString};

use kurbo::Point;
use smallvec::SmallVec;
use understory_timing::{Millis, TimerToken};

use crate::config::GestureConfig;
use crate::event::{Detail, GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::position::CoordinatePolicy;
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler, TimerTag};
use crate::tracker::PointTracker;

const DEFAULT_FRAME_INTERVAL: Millis = 16;

/// Drag recognizer.
#[derive(Clone, Debug)]
pub struct Drag {
    state: RecognizerState,
    monitor: bool,
    frames: Option<FrameCoalescer>,
}

impl Drag {
    /// Creates a drag recognizer admitting any number of contacts by default.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(1, usize::MAX);
        let base = if config.monitor {
            Listen::DOWN | Listen::MOVE
        } else {
            Listen::DOWN
        };
        let frames = config.animation_frame.then(|| {
            FrameCoalescer::new(config.frame_interval.unwrap_or(DEFAULT_FRAME_INTERVAL))
        });
        Self {
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), base),
            monitor: config.monitor,
            frames,
        }
    }

    fn track(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if self.state.tracker.start_session(input, cx.geometry()) {
            self.state
                .listen(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
        }
    }

    fn on_down(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if self.monitor {
            self.state.tracker.refresh_geometry(cx.geometry());
        }
        self.track(input, cx);
        send(&mut self.state.tracker, &mut self.frames, input, Phase::Down, cx);
    }

    fn on_move(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if self.state.tracker.active() == 0 {
            if !self.monitor {
                return;
            }
            self.track(input, cx);
        }
        self.state.tracker.update_session(input);
        send(&mut self.state.tracker, &mut self.frames, input, Phase::Move, cx);
    }

    fn on_up(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        let monitor = self.monitor;
        let Self { state, frames, .. } = self;
        let complete = state
            .tracker
            .end_session(input, |tracker| send(tracker, frames, input, Phase::Up, cx));
        if !complete {
            return;
        }
        state.unlisten(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
        if monitor {
            state.listen(Listen::MOVE);
        }
        if let Some(frames) = frames {
            frames.stop(cx.scheduler());
        }
    }
}

/// Emits one event per changed contact that this drag tracks.
fn send(
    tracker: &mut PointTracker,
    frames: &mut Option<FrameCoalescer>,
    input: &RawInput,
    phase: Phase,
    cx: &mut Cx<'_>,
) {
    let fingers = tracker.active();
    let rebase = tracker.policy() == CoordinatePolicy::DifferenceFromLast;
    for sample in &input.changed {
        if tracker.point(sample.id).is_some_and(|p| p.dirty) {
            tracker.restart_contact(sample.id, sample.page, input.time);
        }
        let Some(point) = tracker.point_mut(sample.id) else {
            continue;
        };
        point.page = sample.page;
        let position = point.local(sample.page);
        if rebase {
            point.offset = sample.page.to_vec2();
        }
        let event = GestureEvent::new(GestureKind::Drag, phase, input.time)
            .at(position)
            .with_fingers(fingers)
            .with_identifier(sample.id.to_string())
            .with_detail(Detail::Drag { start: point.start });
        match frames {
            Some(frames) => frames.offer(event, cx),
            None => cx.emit(event),
        }
    }
}

impl Recognizer for Drag {
    fn kind(&self) -> GestureKind {
        GestureKind::Drag
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

    fn on_timer(&mut self, tag: TimerTag, cx: &mut Cx<'_>) {
        if let (TimerTag::AnimationFrame, Some(frames)) = (tag, &mut self.frames) {
            frames.tick(cx);
        }
    }

    fn stop_animation(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(frames) = &mut self.frames {
            frames.stop(scheduler);
        }
    }

    fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop_animation(scheduler);
    }
}

/// Holds back drag moves until the next frame.
#[derive(Clone, Debug)]
struct FrameCoalescer {
    period: Millis,
    timer: Option<TimerToken>,
    /// Latest unreported move per contact.
    pending: SmallVec<[GestureEvent; 4]>,
    /// Last reported position per contact.
    reported: SmallVec<[(String, Point); 4]>,
}

impl FrameCoalescer {
    fn new(period: Millis) -> Self {
        Self {
            period: period.max(1),
            timer: None,
            pending: SmallVec::new(),
            reported: SmallVec::new(),
        }
    }

    fn offer(&mut self, event: GestureEvent, cx: &mut Cx<'_>) {
        match event.phase {
            Phase::Down => {
                self.remember(&event);
                cx.emit(event);
                self.ensure_running(cx);
            }
            Phase::Up => {
                self.pending.retain(|p| p.identifier != event.identifier);
                self.reported.retain(|(id, _)| *id != event.identifier);
                cx.emit(event);
            }
            _ => {
                match self
                    .pending
                    .iter_mut()
                    .find(|p| p.identifier == event.identifier)
                {
                    Some(slot) => *slot = event,
                    None => self.pending.push(event),
                }
                self.ensure_running(cx);
            }
        }
    }

    fn tick(&mut self, cx: &mut Cx<'_>) {
        for event in core::mem::take(&mut self.pending) {
            let unchanged = self
                .reported
                .iter()
                .any(|(id, at)| *id == event.identifier && *at == event.position);
            if unchanged {
                continue;
            }
            self.remember(&event);
            cx.emit(event);
        }
    }

    fn ensure_running(&mut self, cx: &mut Cx<'_>) {
        if self.timer.is_none() {
            self.timer = Some(cx.set_interval(self.period, TimerTag::AnimationFrame));
        }
    }

    fn remember(&mut self, event: &GestureEvent) {
        match self
            .reported
            .iter_mut()
            .find(|(id, _)| *id == event.identifier)
        {
            Some((_, at)) => *at = event.position,
            None => self
                .reported
                .push((event.identifier.clone(), event.position)),
        }
    }

    fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(token) = self.timer.take() {
            scheduler.cancel(token);
        }
        self.pending.clear();
        self.reported.clear();
    }
}
