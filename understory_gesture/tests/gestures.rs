// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for the `understory_gesture` recognizers.
//!
//! Each test feeds host-shaped [`NativeEvent`]s through a
//! [`NativeEventBridge`] into one recognizer, firing timers from a
//! [`TimerQueue`] in between, exactly as a host event loop would.

use kurbo::{Point, Rect};
use understory_gesture::recognizer::{self, Cx, Recognizer, TimerTag};
use understory_gesture::{
    ContactId, Edge, GestureConfig, GestureEvent, GestureKind, InputModality, NativeEvent,
    NativeEventBridge, Phase, RawInput, Touch,
};
use understory_timing::{Millis, TimerQueue};

struct Driver {
    bridge: NativeEventBridge,
    recognizer: Box<dyn Recognizer>,
    timers: TimerQueue<TimerTag>,
    target: Rect,
    events: Vec<GestureEvent>,
}

impl Driver {
    fn new(kind: GestureKind, config: GestureConfig) -> Self {
        Self {
            bridge: NativeEventBridge::default(),
            recognizer: recognizer::build(kind, &config),
            timers: TimerQueue::new(),
            target: Rect::new(0.0, 0.0, 600.0, 600.0),
            events: Vec::new(),
        }
    }

    fn advance(&mut self, now: Millis) {
        while let Some(fired) = self.timers.pop_due(now) {
            let mut cx = Cx::new(fired.deadline, &mut self.timers, &self.target, &mut self.events);
            self.recognizer.on_timer(fired.payload, &mut cx);
        }
    }

    fn native(&mut self, event: NativeEvent) {
        self.advance(event.time);
        if let Some(input) = self.bridge.normalize(&event) {
            self.input(input);
        }
    }

    fn input(&mut self, input: RawInput) {
        self.advance(input.time);
        if self.recognizer.accepts(input.edge) {
            let mut cx = Cx::new(input.time, &mut self.timers, &self.target, &mut self.events);
            self.recognizer.on_input(&input, &mut cx);
        }
    }

    fn mouse(&mut self, ty: &str, time: Millis, x: f64, y: f64) {
        self.native(NativeEvent::new(ty, time, (x, y)));
    }

    fn phases(&self) -> Vec<Phase> {
        self.events.iter().map(|e| e.phase).collect()
    }
}

fn touches(list: &[(u64, f64, f64)]) -> Vec<Touch> {
    list.iter().map(|&(id, x, y)| Touch::new(id, (x, y))).collect()
}

#[test]
fn tap_fires_once_within_timeout() {
    for (up_at, expected) in [(120, 1), (250, 1), (260, 0)] {
        let mut d = Driver::new(GestureKind::Tap, GestureConfig::new());
        d.mouse("mousedown", 0, 50.0, 50.0);
        d.mouse("mousemove", 60, 53.0, 52.0);
        d.mouse("mouseup", up_at, 53.0, 52.0);
        assert_eq!(d.events.len(), expected, "up at {up_at}");
    }
}

#[test]
fn longpress_start_and_end_follow_release() {
    let mut d = Driver::new(GestureKind::LongPress, GestureConfig::new());
    d.mouse("mousedown", 0, 50.0, 50.0);
    d.advance(499);
    assert!(d.events.is_empty());
    d.advance(500);
    assert_eq!(d.phases(), [Phase::Start]);
    d.mouse("mouseup", 800, 50.0, 50.0);
    assert_eq!(d.phases(), [Phase::Start, Phase::End]);

    let mut d = Driver::new(GestureKind::LongPress, GestureConfig::new());
    d.mouse("mousedown", 0, 50.0, 50.0);
    d.mouse("mousemove", 200, 80.0, 50.0);
    d.mouse("mouseup", 800, 80.0, 50.0);
    assert!(d.events.is_empty());
}

#[test]
fn touch_pinch_reaches_double_scale() {
    let mut d = Driver::new(GestureKind::Gesture, GestureConfig::new());
    d.native(NativeEvent::touch(
        "touchstart",
        0,
        touches(&[(11, 200.0, 300.0), (12, 400.0, 300.0)]),
        touches(&[(11, 200.0, 300.0), (12, 400.0, 300.0)]),
    ));
    d.native(NativeEvent::touch(
        "touchmove",
        16,
        touches(&[(11, 100.0, 300.0), (12, 500.0, 300.0)]),
        touches(&[(11, 100.0, 300.0), (12, 500.0, 300.0)]),
    ));
    let change = d.events.last().unwrap();
    assert_eq!(change.phase, Phase::Change);
    assert!((change.scale().unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(change.position, Point::new(300.0, 300.0));
    assert_eq!(change.identifier, "11,12");

    d.native(NativeEvent::touch(
        "touchend",
        32,
        touches(&[(11, 100.0, 300.0)]),
        touches(&[(12, 500.0, 300.0)]),
    ));
    assert_eq!(d.phases(), [Phase::Start, Phase::Change, Phase::End]);
}

#[test]
fn quarter_turn_reads_ninety_degrees() {
    let mut d = Driver::new(GestureKind::Gesture, GestureConfig::new());
    let at = |deg: f64| {
        let r = deg.to_radians();
        (300.0 + 100.0 * r.cos(), 300.0 + 100.0 * r.sin())
    };
    let pair = |edge, time, a: f64| {
        RawInput::new(edge, time)
            .with_sample(ContactId(1), at(a + 180.0))
            .with_sample(ContactId(2), at(a))
    };
    // Contact 1 starts at 180° and crosses the ±180° line on its way.
    d.input(pair(Edge::Down, 0, 0.0));
    for step in 1..=9 {
        d.input(pair(Edge::Move, step * 10, step as f64 * 10.0));
    }
    let rotation = d.events.last().and_then(GestureEvent::rotation).unwrap();
    assert!((rotation - 90.0).abs() < 1e-6, "rotation {rotation}");
}

#[test]
fn drag_frames_skip_repeats_and_deliver_up() {
    let config = GestureConfig::new().animation_frame(true);
    let mut d = Driver::new(GestureKind::Drag, config);
    d.mouse("mousedown", 0, 10.0, 10.0);
    d.mouse("mousemove", 5, 20.0, 10.0);
    d.mouse("mousemove", 10, 30.0, 10.0);
    d.advance(100);
    d.mouse("mousemove", 101, 30.0, 10.0);
    d.advance(150);
    d.mouse("mouseup", 151, 30.0, 10.0);
    d.advance(300);

    assert_eq!(d.phases(), [Phase::Down, Phase::Move, Phase::Up]);
    let positions: Vec<Point> = d.events.iter().map(|e| e.position).collect();
    assert_eq!(
        positions,
        [
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 10.0)
        ]
    );
    assert!(d.timers.is_empty());
}

#[test]
fn double_tap_window_and_distance() {
    let run = |gap: Millis, second_x: f64| {
        let mut d = Driver::new(GestureKind::DoubleTap, GestureConfig::new());
        d.mouse("mousedown", 0, 100.0, 100.0);
        d.mouse("mouseup", 50, 100.0, 100.0);
        d.mouse("mousedown", gap, second_x, 100.0);
        d.mouse("mouseup", gap + 50, second_x, 100.0);
        d.advance(gap + 2000);
        d.events.len()
    };
    assert_eq!(run(300, 100.0), 1);
    assert_eq!(run(900, 100.0), 0);
    assert_eq!(run(300, 140.0), 0);
}

#[test]
fn swipe_speed_threshold() {
    let run = |duration: Millis| {
        let mut d = Driver::new(GestureKind::Swipe, GestureConfig::new());
        d.mouse("mousedown", 0, 100.0, 200.0);
        d.mouse("mousemove", duration / 2, 250.0, 200.0);
        d.mouse("mousemove", duration, 400.0, 200.0);
        d.mouse("mouseup", duration, 400.0, 200.0);
        d.events
    };
    let fast = run(200);
    assert_eq!(fast.len(), 1);
    assert_eq!(fast[0].angle(), Some(0.0));
    assert!(run(500).is_empty());
}

#[test]
fn compat_mouse_after_touch_does_not_tap_twice() {
    let mut d = Driver::new(GestureKind::Tap, GestureConfig::new());
    d.bridge = NativeEventBridge::default().with_compat_mouse_suppression(true);
    d.native(NativeEvent::touch(
        "touchstart",
        0,
        touches(&[(5, 50.0, 50.0)]),
        touches(&[(5, 50.0, 50.0)]),
    ));
    d.native(NativeEvent::touch("touchend", 80, touches(&[(5, 50.0, 50.0)]), []));
    d.mouse("mousedown", 90, 50.0, 50.0);
    d.mouse("mouseup", 95, 50.0, 50.0);
    assert_eq!(d.phases(), [Phase::Tap]);

    d.mouse("mousedown", 10_000, 50.0, 50.0);
    d.mouse("mouseup", 10_100, 50.0, 50.0);
    assert_eq!(d.phases(), [Phase::Tap, Phase::Tap]);
    assert_eq!(d.bridge.modality(), InputModality::Mouse);
}

#[test]
fn detach_cancels_pending_timers() {
    let mut d = Driver::new(GestureKind::LongPress, GestureConfig::new());
    d.mouse("mousedown", 0, 50.0, 50.0);
    assert!(!d.timers.is_empty());
    d.recognizer.detach(&mut d.timers);
    d.recognizer.detach(&mut d.timers);
    assert!(d.timers.is_empty());
    assert!(!d.recognizer.is_attached());
    d.advance(1000);
    assert!(d.events.is_empty());
}
