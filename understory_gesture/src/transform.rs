// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch and rotate (the `gesture` gesture).
//!
//! The gesture starts when the contact count reaches `minFingers` (2 by
//! default) and ends when it drops below it again. In between, every move
//! reports:
//!
//! - the centroid of the contacts still down,
//! - `scale`: the mean over contacts of the current distance from the
//!   centroid divided by the distance at the first usable reading,
//! - `rotation`: the mean over contacts of the angle each contact has swept
//!   around the centroid, in degrees. Each step adds the signed minimal
//!   difference between consecutive angles, so the total never jumps by a
//!   full turn when a contact crosses the ±180° line.
//!
//! A contact sitting exactly on the centroid has no direction and no usable
//! distance. It contributes to neither average until it moves off the
//! centroid; with no contributing contact the scale is 1.

use kurbo::Point;
use smallvec::SmallVec;

use crate::config::GestureConfig;
use crate::event::{Detail, GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState, Scheduler};
use crate::tracker::PointTracker;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    /// Waiting for enough contacts.
    Idle,
    /// Between start and end.
    Active,
    /// Ended; waits for the session to finish.
    Done,
}

/// Pinch/rotate recognizer.
#[derive(Clone, Debug)]
pub struct Transform {
    state: RecognizerState,
    stage: Stage,
    centroid: Point,
    scale: f64,
    rotation: f64,
}

impl Transform {
    /// Creates a pinch/rotate recognizer; `minFingers` defaults to 2.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(2, usize::MAX);
        Self {
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), Listen::DOWN),
            stage: Stage::Idle,
            centroid: Point::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    fn on_down(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        let tracker = &mut self.state.tracker;
        let before = tracker.active();
        if tracker.start_session(input, cx.geometry()) {
            self.stage = Stage::Idle;
            self.state
                .listen(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
        }
        let tracker = &mut self.state.tracker;
        let after = tracker.active();
        let min = tracker.min();
        if self.stage != Stage::Idle || !(before < min && min <= after) {
            return;
        }
        let Some(centroid) = tracker.centroid() else {
            return;
        };
        for point in tracker.points_mut().iter_mut().filter(|p| !p.ended) {
            let v = point.current - centroid;
            let distance = v.length();
            point.rotation = 0.0;
            point.start_distance = (distance > 0.0).then_some(distance);
            point.prev_angle = (distance > 0.0).then(|| v.atan2().to_degrees());
        }
        self.stage = Stage::Active;
        self.centroid = centroid;
        self.scale = 1.0;
        self.rotation = 0.0;
        cx.emit(self.event(Phase::Start, input));
    }

    fn on_move(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        let tracker = &mut self.state.tracker;
        tracker.update_session(input);
        if self.stage != Stage::Active || tracker.active() < tracker.min() {
            return;
        }
        let Some(centroid) = tracker.centroid() else {
            return;
        };

        let mut scale_sum = 0.0;
        let mut scaled = 0_u32;
        let mut rotation_sum = 0.0;
        let mut active = 0_u32;
        let mut touches = SmallVec::<[Point; 4]>::new();
        for point in tracker.points_mut().iter_mut().filter(|p| !p.ended) {
            let v = point.current - centroid;
            let distance = v.length();
            if distance > 0.0 {
                match point.start_distance {
                    Some(start) => scale_sum += distance / start,
                    None => {
                        point.start_distance = Some(distance);
                        scale_sum += 1.0;
                    }
                }
                scaled += 1;

                let angle = v.atan2().to_degrees();
                if let Some(prev) = point.prev_angle {
                    point.rotation += shortest_turn(angle - prev);
                }
                point.prev_angle = Some(angle);
            }
            rotation_sum += point.rotation;
            active += 1;
            touches.push(point.current);
        }

        self.centroid = centroid;
        self.scale = if scaled > 0 {
            scale_sum / f64::from(scaled)
        } else {
            1.0
        };
        self.rotation = if active > 0 {
            rotation_sum / f64::from(active)
        } else {
            0.0
        };
        let event = self.event(Phase::Change, input);
        cx.emit(event.with_detail(Detail::Transform {
            scale: self.scale,
            rotation: self.rotation,
            touches,
        }));
    }

    fn on_up(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if self.state.tracker.end_session(input, |_| {}) {
            self.state
                .unlisten(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
        }
        let tracker = &self.state.tracker;
        if self.stage == Stage::Active && tracker.active() < tracker.min() {
            self.stage = Stage::Done;
            cx.emit(self.event(Phase::End, input));
        }
    }

    fn event(&self, phase: Phase, input: &RawInput) -> GestureEvent {
        let tracker = &self.state.tracker;
        GestureEvent::new(GestureKind::Gesture, phase, input.time)
            .at(self.centroid)
            .with_fingers(tracker.active())
            .with_identifier(tracker.identifier())
            .with_detail(Detail::Transform {
                scale: self.scale,
                rotation: self.rotation,
                touches: SmallVec::new(),
            })
    }
}

/// Maps an angle difference in degrees into `(-180, 180]`.
fn shortest_turn(mut delta: f64) -> f64 {
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

impl Recognizer for Transform {
    fn kind(&self) -> GestureKind {
        GestureKind::Gesture
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

    fn teardown(&mut self, _scheduler: &mut dyn Scheduler) {
        self.stage = Stage::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactId;
    use crate::testing::Harness;
    use alloc::vec::Vec;
    use understory_timing::Millis;

    fn pair(edge: Edge, time: Millis, a: (f64, f64), b: (f64, f64)) -> RawInput {
        RawInput::new(edge, time)
            .with_sample(ContactId(1), a)
            .with_sample(ContactId(2), b)
    }

    fn on_circle(deg: f64, r: f64) -> (f64, f64) {
        let rad = deg.to_radians();
        (200.0 + r * rad.cos(), 200.0 + r * rad.sin())
    }

    #[test]
    fn shortest_turn_wraps() {
        assert_eq!(shortest_turn(350.0), -10.0);
        assert_eq!(shortest_turn(-350.0), 10.0);
        assert_eq!(shortest_turn(180.0), 180.0);
        assert_eq!(shortest_turn(-180.0), 180.0);
    }

    #[test]
    fn pinch_doubles_scale() {
        let mut h = Harness::new(GestureKind::Gesture, GestureConfig::new());
        h.feed(pair(Edge::Down, 0, (100.0, 200.0), (300.0, 200.0)));
        h.feed(pair(Edge::Move, 16, (50.0, 200.0), (350.0, 200.0)));
        h.feed(pair(Edge::Move, 32, (0.0, 200.0), (400.0, 200.0)));
        h.feed(RawInput::new(Edge::Up, 48));

        assert_eq!(
            h.phases(),
            [Phase::Start, Phase::Change, Phase::Change, Phase::End]
        );
        let last_change = &h.events[2];
        assert!((last_change.scale().unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(last_change.position, Point::new(200.0, 200.0));
        assert_eq!(h.events[3].fingers, 0);
    }

    #[test]
    fn rotation_crosses_wraparound_without_jump() {
        let mut h = Harness::new(GestureKind::Gesture, GestureConfig::new());
        h.feed(pair(Edge::Down, 0, on_circle(180.0, 100.0), on_circle(0.0, 100.0)));
        for (i, step) in [30.0, 60.0, 90.0].into_iter().enumerate() {
            let t = 16 * (i as Millis + 1);
            h.feed(pair(
                Edge::Move,
                t,
                on_circle(180.0 + step, 100.0),
                on_circle(step, 100.0),
            ));
        }
        let rotations: Vec<f64> = h.events.iter().filter_map(GestureEvent::rotation).collect();
        assert_eq!(rotations.len(), 4);
        for (got, want) in rotations.iter().zip([0.0, 30.0, 60.0, 90.0]) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn start_once_per_session_and_end_below_minimum() {
        let mut h = Harness::new(GestureKind::Gesture, GestureConfig::new());
        h.feed(RawInput::new(Edge::Down, 0).with_sample(ContactId(1), (100.0, 100.0)));
        assert!(h.events.is_empty());
        h.feed(RawInput::new(Edge::Down, 10).with_sample(ContactId(2), (200.0, 100.0)));
        h.feed(RawInput::new(Edge::Down, 20).with_sample(ContactId(3), (150.0, 200.0)));
        h.feed(
            RawInput::new(Edge::Up, 30)
                .with_sample(ContactId(3), (150.0, 200.0))
                .with_touching([ContactId(1), ContactId(2)]),
        );
        h.feed(
            RawInput::new(Edge::Up, 40)
                .with_sample(ContactId(2), (200.0, 100.0))
                .with_touching([ContactId(1)]),
        );
        h.feed(RawInput::new(Edge::Up, 50).with_sample(ContactId(1), (100.0, 100.0)));
        assert_eq!(h.phases(), [Phase::Start, Phase::End]);
        assert_eq!(h.events[1].fingers, 1);
    }

    #[test]
    fn coincident_contacts_keep_unit_scale() {
        let mut h = Harness::new(GestureKind::Gesture, GestureConfig::new());
        h.feed(pair(Edge::Down, 0, (100.0, 100.0), (100.0, 100.0)));
        h.feed(pair(Edge::Move, 16, (100.0, 100.0), (100.0, 100.0)));
        assert_eq!(h.events.last().and_then(GestureEvent::scale), Some(1.0));
        h.feed(pair(Edge::Move, 32, (90.0, 100.0), (110.0, 100.0)));
        h.feed(pair(Edge::Move, 48, (80.0, 100.0), (120.0, 100.0)));
        let scale = h.events.last().and_then(GestureEvent::scale).unwrap();
        assert!((scale - 2.0).abs() < 1e-9);
    }
}
