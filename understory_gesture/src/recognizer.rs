// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared recognizer shape.
//!
//! Every gesture is a small state machine over the down → move* → up edges,
//! with a [`PointTracker`] in front of it. A recognizer owns a
//! [`RecognizerState`] (tracker plus the edges it currently listens to) and
//! implements [`Recognizer::on_input`], and [`Recognizer::on_timer`] if it
//! uses timers. The caller drives it with a [`Cx`]: the current time, a
//! [`Scheduler`] for timers, the target's geometry and a buffer that collects
//! the emitted [`GestureEvent`]s.
//!
//! ```
//! use kurbo::Rect;
//! use understory_gesture::config::GestureConfig;
//! use understory_gesture::event::{GestureKind, Phase};
//! use understory_gesture::input::{Edge, RawInput};
//! use understory_gesture::recognizer::{self, Cx, TimerTag};
//! use understory_timing::TimerQueue;
//!
//! let target = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let mut timers = TimerQueue::<TimerTag>::new();
//! let mut events = Vec::new();
//! let mut tap = recognizer::build(GestureKind::Tap, &GestureConfig::new());
//!
//! for input in [
//!     RawInput::mouse(Edge::Down, 0, (50.0, 50.0)),
//!     RawInput::mouse(Edge::Up, 120, (50.0, 50.0)),
//! ] {
//!     if tap.accepts(input.edge) {
//!         let mut cx = Cx::new(input.time, &mut timers, &target, &mut events);
//!         tap.on_input(&input, &mut cx);
//!     }
//! }
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].phase, Phase::Tap);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_timing::{Millis, TimerQueue, TimerToken};

use crate::config::GestureConfig;
use crate::event::{GestureEvent, GestureKind};
use crate::geometry::GeometrySource;
use crate::input::{Edge, RawInput};
use crate::tracker::PointTracker;

bitflags::bitflags! {
    /// Input edges a recognizer is listening to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Listen: u8 {
        /// Contact down on the target.
        const DOWN     = 0b0000_0001;
        /// Contact moves.
        const MOVE     = 0b0000_0010;
        /// Contact up.
        const UP       = 0b0000_0100;
        /// Pointer enters the target.
        const OVER     = 0b0000_1000;
        /// Pointer leaves the target.
        const OUT      = 0b0001_0000;
        /// Wheel steps.
        const WHEEL    = 0b0010_0000;
        /// Move and up are taken from the whole document, not only the target.
        const DOCUMENT = 0b0100_0000;
    }
}

impl Listen {
    /// The flag for one input edge.
    #[must_use]
    pub const fn for_edge(edge: Edge) -> Self {
        match edge {
            Edge::Down => Self::DOWN,
            Edge::Move => Self::MOVE,
            Edge::Up => Self::UP,
            Edge::Over => Self::OVER,
            Edge::Out => Self::OUT,
            Edge::Wheel => Self::WHEEL,
        }
    }
}

/// What a timer was scheduled for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerTag {
    /// End of the double-tap window.
    DoubleTapWindow,
    /// Longpress delay elapsed.
    LongPress,
    /// Hover start delay elapsed.
    HoverStart,
    /// Hover sampling tick.
    HoverSample,
    /// No wheel input for the silence timeout.
    WheelSilence,
    /// Drag coalescing frame.
    AnimationFrame,
}

/// Timer service handed to recognizers.
pub trait Scheduler {
    /// Schedules a timer at `deadline`, repeating every `period` if set.
    fn schedule(&mut self, deadline: Millis, period: Option<Millis>, tag: TimerTag) -> TimerToken;
    /// Cancels a timer; unknown tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}

impl Scheduler for TimerQueue<TimerTag> {
    fn schedule(&mut self, deadline: Millis, period: Option<Millis>, tag: TimerTag) -> TimerToken {
        match period {
            Some(period) => self.schedule_repeating(deadline, 0, period, tag),
            None => self.schedule_at(deadline, tag),
        }
    }

    fn cancel(&mut self, token: TimerToken) {
        Self::cancel(self, token);
    }
}

/// Everything a recognizer needs while handling one input or timer.
pub struct Cx<'a> {
    now: Millis,
    scheduler: &'a mut dyn Scheduler,
    geometry: &'a dyn GeometrySource,
    events: &'a mut Vec<GestureEvent>,
}

impl fmt::Debug for Cx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cx")
            .field("now", &self.now)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Cx<'a> {
    /// Creates a context.
    pub fn new(
        now: Millis,
        scheduler: &'a mut dyn Scheduler,
        geometry: &'a dyn GeometrySource,
        events: &'a mut Vec<GestureEvent>,
    ) -> Self {
        Self {
            now,
            scheduler,
            geometry,
            events,
        }
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// The target's geometry source.
    #[must_use]
    pub fn geometry(&self) -> &'a dyn GeometrySource {
        self.geometry
    }

    /// The timer service.
    pub fn scheduler(&mut self) -> &mut dyn Scheduler {
        &mut *self.scheduler
    }

    /// Queues an event for the listener.
    pub fn emit(&mut self, event: GestureEvent) {
        tracing::trace!(kind = %event.kind, phase = %event.phase, "gesture event");
        self.events.push(event);
    }

    /// Schedules a one-shot timer `delay` milliseconds from now.
    pub fn set_timeout(&mut self, delay: Millis, tag: TimerTag) -> TimerToken {
        self.scheduler
            .schedule(self.now.saturating_add(delay), None, tag)
    }

    /// Schedules a repeating timer, first due `period` milliseconds from now.
    pub fn set_interval(&mut self, period: Millis, tag: TimerTag) -> TimerToken {
        self.scheduler
            .schedule(self.now.saturating_add(period), Some(period), tag)
    }

    /// Cancels the timer in `slot`, if any, and empties the slot.
    pub fn clear_timer(&mut self, slot: &mut Option<TimerToken>) {
        if let Some(token) = slot.take() {
            self.scheduler.cancel(token);
        }
    }
}

/// State every recognizer carries.
#[derive(Clone, Debug)]
pub struct RecognizerState {
    /// Contacts of the current session.
    pub tracker: PointTracker,
    listening: Listen,
    base: Listen,
    paused: Listen,
    attached: bool,
}

impl RecognizerState {
    /// Creates an attached state listening to `base`.
    #[must_use]
    pub fn new(tracker: PointTracker, base: Listen) -> Self {
        Self {
            tracker,
            listening: base,
            base,
            paused: Listen::empty(),
            attached: true,
        }
    }

    /// Edges currently listened to.
    #[must_use]
    pub fn listening(&self) -> Listen {
        self.listening
    }

    /// Edges listened to while idle.
    #[must_use]
    pub fn base(&self) -> Listen {
        self.base
    }

    /// Whether the recognizer is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether an input on `edge` should be delivered.
    #[must_use]
    pub fn accepts(&self, edge: Edge) -> bool {
        self.attached && self.listening.contains(Listen::for_edge(edge))
    }

    /// Starts listening to `flags`.
    pub fn listen(&mut self, flags: Listen) {
        self.listening |= flags;
    }

    /// Stops listening to `flags`.
    pub fn unlisten(&mut self, flags: Listen) {
        self.listening.remove(flags);
    }

    /// Drops move and up listening, remembering what was dropped.
    pub fn pause(&mut self) {
        let session = Listen::MOVE | Listen::UP;
        self.paused |= self.listening & session;
        self.listening.remove(session);
    }

    /// Restores what [`RecognizerState::pause`] dropped.
    pub fn resume(&mut self) {
        self.listening |= self.paused;
        self.paused = Listen::empty();
    }

    /// Re-enables a detached recognizer with its idle listening set.
    pub fn attach(&mut self) {
        if !self.attached {
            self.attached = true;
            self.listening = self.base;
        }
    }

    /// Stops all listening and forgets the session.
    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.tracker.reset();
            self.listening = Listen::empty();
            self.paused = Listen::empty();
        }
    }
}

/// A gesture state machine.
pub trait Recognizer: fmt::Debug {
    /// The gesture this recognizer produces.
    fn kind(&self) -> GestureKind;

    /// Shared state.
    fn state(&self) -> &RecognizerState;

    /// Shared state, mutably.
    fn state_mut(&mut self) -> &mut RecognizerState;

    /// Handles one input on an edge the recognizer accepts.
    fn on_input(&mut self, input: &RawInput, cx: &mut Cx<'_>);

    /// Handles a timer this recognizer scheduled.
    fn on_timer(&mut self, tag: TimerTag, cx: &mut Cx<'_>) {
        let _ = (tag, cx);
    }

    /// Cancels pending timers and forgets per-session scratch state.
    fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        let _ = scheduler;
    }

    /// Stops frame coalescing, if any.
    fn stop_animation(&mut self, scheduler: &mut dyn Scheduler) {
        let _ = scheduler;
    }

    /// Whether an input on `edge` should be delivered.
    fn accepts(&self, edge: Edge) -> bool {
        self.state().accepts(edge)
    }

    /// Edges currently listened to.
    fn listening(&self) -> Listen {
        self.state().listening()
    }

    /// Drops move and up listening.
    fn pause(&mut self) {
        self.state_mut().pause();
    }

    /// Restores move and up listening dropped by a pause.
    fn resume(&mut self) {
        self.state_mut().resume();
    }

    /// Stops frame coalescing, then pauses.
    fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop_animation(scheduler);
        self.pause();
    }

    /// Re-enables a detached recognizer.
    fn attach(&mut self) {
        self.state_mut().attach();
    }

    /// Tears the recognizer down. Safe to call more than once.
    fn detach(&mut self, scheduler: &mut dyn Scheduler) {
        self.teardown(scheduler);
        self.state_mut().detach();
    }

    /// Whether the recognizer is attached.
    fn is_attached(&self) -> bool {
        self.state().is_attached()
    }
}

/// Builds the recognizer for `kind` with `config`.
#[must_use]
pub fn build(kind: GestureKind, config: &GestureConfig) -> Box<dyn Recognizer> {
    use crate::{click, double_tap, drag, hover, swipe, tap, transform, wheel};
    match kind {
        GestureKind::Click => Box::new(click::Click::new(config)),
        GestureKind::DoubleClick | GestureKind::DoubleTap => {
            Box::new(double_tap::DoubleTap::new(kind, config))
        }
        GestureKind::Drag => Box::new(drag::Drag::new(config)),
        GestureKind::Gesture => Box::new(transform::Transform::new(config)),
        GestureKind::Swipe => Box::new(swipe::Swipe::new(config)),
        GestureKind::Tap | GestureKind::LongPress => Box::new(tap::Tap::new(kind, config)),
        GestureKind::Hover => Box::new(hover::Hover::new(config)),
        GestureKind::Wheel => Box::new(wheel::Wheel::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_and_resume_touch_only_move_and_up() {
        let mut s = RecognizerState::new(PointTracker::default(), Listen::DOWN);
        s.listen(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
        s.pause();
        assert_eq!(s.listening(), Listen::DOWN | Listen::DOCUMENT);
        assert!(!s.accepts(Edge::Move));
        s.resume();
        assert!(s.accepts(Edge::Move) && s.accepts(Edge::Up));
    }

    #[test]
    fn detach_is_idempotent_and_attach_restores_base() {
        let mut s = RecognizerState::new(PointTracker::default(), Listen::OVER);
        s.listen(Listen::OUT);
        s.detach();
        s.detach();
        assert!(!s.is_attached());
        assert!(!s.accepts(Edge::Over));
        s.attach();
        assert_eq!(s.listening(), Listen::OVER);
    }

    #[test]
    fn cx_timers_go_through_scheduler() {
        let mut timers = TimerQueue::<TimerTag>::new();
        let mut events = Vec::new();
        let geometry = kurbo::Rect::ZERO;
        let mut cx = Cx::new(100, &mut timers, &geometry, &mut events);
        let mut slot = Some(cx.set_timeout(50, TimerTag::LongPress));
        cx.set_interval(30, TimerTag::HoverSample);
        cx.clear_timer(&mut slot);
        assert!(slot.is_none());
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(130));
        let fired = timers.pop_due(130).unwrap();
        assert_eq!(fired.payload, TimerTag::HoverSample);
        assert_eq!(timers.next_deadline(), Some(160));
    }
}
