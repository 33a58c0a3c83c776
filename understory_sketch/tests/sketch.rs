// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for recording strokes from a live drag recognizer.

use kurbo::Rect;
use understory_gesture::recognizer::{self, Cx, Recognizer, TimerTag};
use understory_gesture::{GestureConfig, GestureEvent, GestureKind, NativeEvent, NativeEventBridge};
use understory_sketch::{ReplayPoll, Sketch, SketchConfig, Tool};
use understory_timing::{Millis, TimerQueue};

/// A 400x300 canvas at (100, 50) on the page, shown at 2x.
struct Canvas {
    bridge: NativeEventBridge,
    drag: Box<dyn Recognizer>,
    timers: TimerQueue<TimerTag>,
    bounds: Rect,
    sketch: Sketch,
}

impl Canvas {
    fn new() -> Self {
        Self {
            bridge: NativeEventBridge::default(),
            drag: recognizer::build(GestureKind::Drag, &GestureConfig::new()),
            timers: TimerQueue::new(),
            bounds: Rect::new(100.0, 50.0, 500.0, 350.0),
            sketch: Sketch::new(SketchConfig {
                width: 400.0,
                height: 300.0,
                zoom: 2.0,
                path: Vec::new(),
            }),
        }
    }

    fn mouse(&mut self, ty: &str, time: Millis, x: f64, y: f64) {
        let Some(input) = self.bridge.normalize(&NativeEvent::new(ty, time, (x, y))) else {
            return;
        };
        if !self.drag.accepts(input.edge) {
            return;
        }
        let mut events: Vec<GestureEvent> = Vec::new();
        let mut cx = Cx::new(time, &mut self.timers, &self.bounds, &mut events);
        self.drag.on_input(&input, &mut cx);
        for event in &events {
            self.sketch.record(event);
        }
    }

    fn stroke(&mut self, start: Millis, points: &[(f64, f64)]) {
        let last = points.len() - 1;
        for (i, &(x, y)) in points.iter().enumerate() {
            let ty = match i {
                0 => "mousedown",
                i if i == last => "mouseup",
                _ => "mousemove",
            };
            self.mouse(ty, start + 20 * i as Millis, x, y);
        }
    }
}

#[test]
fn strokes_are_stored_in_canvas_units() {
    let mut canvas = Canvas::new();
    canvas.stroke(0, &[(110.0, 60.0), (130.0, 60.0), (150.0, 80.0)]);

    let path = canvas.sketch.path();
    let points: Vec<(f64, f64, Millis)> = path.iter().map(|e| (e.x, e.y, e.lapse)).collect();
    assert_eq!(points, [(5.0, 5.0, 0), (15.0, 5.0, 20), (25.0, 15.0, 20)]);
    assert!(path[0].begin_path);
    assert!(!canvas.sketch.is_recording());
}

#[test]
fn eraser_strokes_keep_their_own_style() {
    let mut canvas = Canvas::new();
    canvas.stroke(0, &[(110.0, 60.0), (200.0, 60.0)]);
    canvas.sketch.set_tool(Tool::Eraser);
    canvas.stroke(500, &[(110.0, 60.0), (200.0, 60.0)]);

    let styles: Vec<bool> = canvas
        .sketch
        .strokes()
        .map(|s| s[0].style.as_ref().is_some_and(|style| style.is_eraser()))
        .collect();
    assert_eq!(styles, [false, true]);

    let json = canvas.sketch.to_json().unwrap();
    let mut restored = Sketch::default();
    restored.load_json(&json).unwrap();
    assert_eq!(restored.path(), canvas.sketch.path());
    assert_eq!(
        restored.to_svg_path_data(Some(2)),
        canvas.sketch.to_svg_path_data(Some(2))
    );
}

#[test]
fn replay_walks_every_sample_then_resumes_recording() {
    let mut canvas = Canvas::new();
    canvas.stroke(0, &[(110.0, 60.0), (120.0, 60.0), (130.0, 60.0)]);
    canvas.stroke(5_000, &[(110.0, 90.0), (120.0, 90.0)]);

    canvas.sketch.start_replay(10_000);
    canvas.stroke(10_001, &[(300.0, 300.0), (310.0, 300.0)]);
    assert_eq!(canvas.sketch.path().len(), 5);

    let mut now = 10_000;
    let mut completed = Vec::new();
    loop {
        match canvas.sketch.poll_replay(now) {
            ReplayPoll::Frame(frame) if frame.completes_stroke => completed.push(frame.index),
            ReplayPoll::Frame(_) => {}
            ReplayPoll::Pending(at) => now = at,
            ReplayPoll::Done => break,
        }
    }
    assert_eq!(completed, [2, 4]);
    assert!(!canvas.sketch.is_replaying());

    canvas.stroke(20_000, &[(110.0, 60.0), (120.0, 60.0)]);
    assert_eq!(canvas.sketch.strokes().count(), 3);
}
