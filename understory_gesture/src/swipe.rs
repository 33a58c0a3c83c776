// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe: a fast flick of one or more contacts in a common direction.
//!
//! When the last contact lifts, each contact's velocity is its distance from
//! start to last move divided by the time between them. The contacts must
//! agree on direction within 20°; otherwise the swipe is rejected. The
//! swipe fires if the mean velocity exceeds `threshold` (0.75 px/ms by
//! default) and the contact count is within bounds.
//!
//! Angles are in degrees in `[0, 360)`, measured from the positive x axis
//! toward the positive y axis of the page. Since page y grows downward, 0 is
//! rightward and 90 is downward. The reported angle is snapped to a multiple
//! of `snap` (90° by default).

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

use crate::config::GestureConfig;
use crate::event::{Detail, GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState};
use crate::tracker::PointTracker;

const DEFAULT_SNAP: f64 = 90.0;
const DEFAULT_THRESHOLD: f64 = 0.75;
const AGREEMENT: f64 = 20.0;

/// Swipe recognizer.
#[derive(Clone, Debug)]
pub struct Swipe {
    state: RecognizerState,
    snap: f64,
    threshold: f64,
}

impl Swipe {
    /// Creates a swipe recognizer.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(1, usize::MAX);
        Self {
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), Listen::DOWN),
            snap: config.snap.unwrap_or(DEFAULT_SNAP),
            threshold: config.threshold.unwrap_or(DEFAULT_THRESHOLD),
        }
    }

    fn on_up(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        if !self.state.tracker.end_session(input, |_| {}) {
            return;
        }
        self.state
            .unlisten(Listen::MOVE | Listen::UP | Listen::DOCUMENT);

        let tracker = &self.state.tracker;
        let mut heading: Option<(f64, f64)> = None;
        let mut start = Vec2::ZERO;
        let mut end = Vec2::ZERO;
        for point in tracker.points() {
            let travel = point.current - point.start;
            let elapsed = point.move_time.saturating_sub(point.start_time);
            let velocity = if elapsed > 0 {
                travel.length() / elapsed as f64
            } else {
                0.0
            };
            let angle = normalize_degrees(travel.atan2().to_degrees());
            heading = match heading {
                None => Some((angle, velocity)),
                Some((a, v)) if angular_distance(a, angle) <= AGREEMENT => {
                    Some((midpoint_degrees(a, angle), (v + velocity) / 2.0))
                }
                Some((a, _)) => {
                    tracing::debug!(a, angle, "swipe directions diverge");
                    return;
                }
            };
            start += point.start.to_vec2();
            end += point.current.to_vec2();
        }
        let Some((angle, velocity)) = heading else {
            return;
        };

        let fingers = tracker.gesture_fingers();
        if !tracker.in_bounds(fingers) || velocity <= self.threshold {
            return;
        }
        let n = fingers as f64;
        let event = GestureEvent::new(GestureKind::Swipe, Phase::Swipe, input.time)
            .at((end / n).to_point())
            .with_fingers(fingers)
            .with_identifier(tracker.identifier())
            .with_detail(Detail::Swipe {
                start: (start / n).to_point(),
                angle: snap_degrees(angle, self.snap),
                velocity,
            });
        cx.emit(event);
    }
}

impl Recognizer for Swipe {
    fn kind(&self) -> GestureKind {
        GestureKind::Swipe
    }

    fn state(&self) -> &RecognizerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecognizerState {
        &mut self.state
    }

    fn on_input(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        match input.edge {
            Edge::Down => {
                if self.state.tracker.start_session(input, cx.geometry()) {
                    self.state
                        .listen(Listen::MOVE | Listen::UP | Listen::DOCUMENT);
                }
                self.state.tracker.update_session(input);
            }
            Edge::Move => {
                self.state.tracker.update_session(input);
            }
            Edge::Up => self.on_up(input, cx),
            _ => {}
        }
    }
}

/// Maps any angle into `[0, 360)`.
fn normalize_degrees(angle: f64) -> f64 {
    let a = angle - 360.0 * (angle / 360.0).floor();
    if a >= 360.0 { 0.0 } else { a }
}

/// Unsigned distance between two directions, in `[0, 180]`.
fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Direction halfway along the short arc from `a` to `b`.
fn midpoint_degrees(a: f64, b: f64) -> f64 {
    let mut turn = normalize_degrees(b - a);
    if turn > 180.0 {
        turn -= 360.0;
    }
    normalize_degrees(a + turn / 2.0)
}

/// Rounds `angle` to the nearest multiple of `snap`, keeping `[0, 360)`.
fn snap_degrees(angle: f64, snap: f64) -> f64 {
    if snap <= 0.0 {
        return angle;
    }
    normalize_degrees((angle / snap).round() * snap)
}
