// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click: one contact down, then up inside the box captured at down.
//!
//! The release only counts if it lands inside the target as it was laid out
//! when the contact went down and the target's scroll containers have not
//! scrolled in between, so a press that turned into a scroll is not a click.

use crate::config::GestureConfig;
use crate::event::{GestureEvent, GestureKind, Phase};
use crate::input::{Edge, RawInput};
use crate::recognizer::{Cx, Listen, Recognizer, RecognizerState};
use crate::tracker::PointTracker;

/// Click recognizer.
#[derive(Clone, Debug)]
pub struct Click {
    state: RecognizerState,
}

impl Click {
    /// Creates a click recognizer; `maxFingers` defaults to 1.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        let (min, max) = config.finger_bounds(1, 1);
        Self {
            state: RecognizerState::new(PointTracker::new(min, max, config.policy()), Listen::DOWN),
        }
    }
}

impl Recognizer for Click {
    fn kind(&self) -> GestureKind {
        GestureKind::Click
    }

    fn state(&self) -> &RecognizerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecognizerState {
        &mut self.state
    }

    fn on_input(&mut self, input: &RawInput, cx: &mut Cx<'_>) {
        let state = &mut self.state;
        match input.edge {
            Edge::Down => {
                if state.tracker.start_session(input, cx.geometry()) {
                    state.listen(Listen::UP);
                }
            }
            Edge::Up => {
                if !state.tracker.end_session(input, |_| {}) {
                    return;
                }
                state.unlisten(Listen::UP);
                let Some(sample) = input.primary() else {
                    return;
                };
                let captured = state.tracker.bounding_box();
                let fresh = cx.geometry().bounding_box();
                let inside = captured.contains_client(fresh.page_to_client(sample.page));
                if !inside || captured.scroll.y != fresh.scroll.y {
                    tracing::trace!(inside, "click rejected");
                    return;
                }
                let Some(first) = state.tracker.first() else {
                    return;
                };
                let event = GestureEvent::new(GestureKind::Click, Phase::Click, input.time)
                    .at(first.start)
                    .with_fingers(state.tracker.gesture_fingers())
                    .with_identifier(state.tracker.identifier());
                cx.emit(event);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use kurbo::{Point, Vec2};

    #[test]
    fn click_inside_fires_at_start_point() {
        let mut h = Harness::new(GestureKind::Click, GestureConfig::new());
        h.feed(RawInput::mouse(Edge::Down, 0, (40.0, 50.0)));
        h.feed(RawInput::mouse(Edge::Up, 90, (45.0, 52.0)));
        assert_eq!(h.phases(), [Phase::Click]);
        assert_eq!(h.events[0].position, Point::new(40.0, 50.0));
        assert_eq!(h.events[0].identifier, "1");
    }

    #[test]
    fn release_outside_target_is_ignored() {
        let mut h = Harness::new(GestureKind::Click, GestureConfig::new());
        h.feed(RawInput::mouse(Edge::Down, 0, (40.0, 50.0)));
        h.feed(RawInput::mouse(Edge::Up, 90, (450.0, 50.0)));
        assert!(h.events.is_empty());
    }

    #[test]
    fn scroll_between_down_and_up_cancels() {
        let mut h = Harness::new(GestureKind::Click, GestureConfig::new());
        h.feed(RawInput::mouse(Edge::Down, 0, (40.0, 50.0)));
        h.geometry = h.geometry.with_scroll(Vec2::new(0.0, 30.0));
        h.feed(RawInput::mouse(Edge::Up, 90, (40.0, 50.0)));
        assert!(h.events.is_empty());
    }

    #[test]
    fn up_without_down_is_not_listened_to() {
        let mut h = Harness::new(GestureKind::Click, GestureConfig::new());
        assert!(!h.recognizer.accepts(Edge::Up));
        h.feed(RawInput::mouse(Edge::Up, 10, (40.0, 50.0)));
        assert!(h.events.is_empty());
    }
}
